//! Translation of parsed shapes into drawing-sink calls.
//!
//! The collector owns the document/page/layer lifecycle discipline and
//! renders the resolved styles (pens, fills, shadows, arrows) into the
//! sink's property vocabulary.  All emitted coordinates are translated by
//! the page's left/top offsets.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt::Write as _;

use tracing::debug;

use crate::sink::{DrawingSink, PropertyList, Unit};
use crate::types::{
    almost_zero, rad2deg, Arrow, Curve, CurveType, Fill, GradientType, HorizontalAlignment,
    Image, LineCapType, LineJoinType, PageSettings, Pen, Point, Shadow, Style, Table, Text,
    Transparency, VerticalAlignment,
};

/// Point on an ellipse of radii `(rx, ry)` around `c` at `angle`.
fn ellipse_point(c: &Point, rx: f64, ry: f64, angle: f64) -> Point {
    Point::new(c.x + rx * angle.cos(), c.y + ry * angle.sin())
}

/// Build the `svg:d` property vector for a curve sequence, translating by
/// the page offsets.
fn create_path(curves: &[Curve], left_offset: f64, top_offset: f64) -> Vec<PropertyList> {
    let mut path = Vec::new();

    for curve in curves {
        if curve.points.len() < 2 {
            continue;
        }

        let mut part = PropertyList::new();
        part.insert_str("librevenge:path-action", "M");
        part.insert_inch("svg:x", curve.points[0].x - left_offset);
        part.insert_inch("svg:y", curve.points[0].y - top_offset);
        path.push(part);

        let mut i = 1;

        for section_type in &curve.section_types {
            let mut part = PropertyList::new();

            match section_type {
                CurveType::Line => {
                    if i >= curve.points.len() {
                        debug!("unexpected end of curve points");
                        continue;
                    }
                    part.insert_str("librevenge:path-action", "L");
                    part.insert_inch("svg:x", curve.points[i].x - left_offset);
                    part.insert_inch("svg:y", curve.points[i].y - top_offset);
                    i += 1;
                }
                CurveType::BezierCurve => {
                    if i + 2 >= curve.points.len() {
                        debug!("unexpected end of curve points");
                        continue;
                    }
                    part.insert_str("librevenge:path-action", "C");
                    part.insert_inch("svg:x1", curve.points[i].x - left_offset);
                    part.insert_inch("svg:y1", curve.points[i].y - top_offset);
                    part.insert_inch("svg:x2", curve.points[i + 1].x - left_offset);
                    part.insert_inch("svg:y2", curve.points[i + 1].y - top_offset);
                    part.insert_inch("svg:x", curve.points[i + 2].x - left_offset);
                    part.insert_inch("svg:y", curve.points[i + 2].y - top_offset);
                    i += 3;
                }
            }

            path.push(part);
        }

        if curve.closed {
            let mut part = PropertyList::new();
            part.insert_str("librevenge:path-action", "Z");
            path.push(part);
        }
    }

    path
}

/// Flatten a path property vector into an SVG-like path string.
fn path_to_string(path: &[PropertyList]) -> String {
    let mut s = String::new();

    for part in path {
        let Some(action) = part.get_str("librevenge:path-action") else {
            continue;
        };

        let coord = (part.get_double("svg:x"), part.get_double("svg:y"));
        let coord1 = (part.get_double("svg:x1"), part.get_double("svg:y1"));
        let coord2 = (part.get_double("svg:x2"), part.get_double("svg:y2"));

        match action {
            "M" | "L" => {
                let (Some(x), Some(y)) = coord else {
                    debug!("incorrect path coordinates");
                    continue;
                };
                let _ = write!(s, "{}{} {} ", action, x, y);
            }
            "C" => {
                let ((Some(x1), Some(y1)), (Some(x2), Some(y2)), (Some(x), Some(y))) =
                    (coord1, coord2, coord)
                else {
                    debug!("incorrect path coordinates");
                    continue;
                };
                let _ = write!(s, "C{} {} {} {} {} {} ", x1, y1, x2, y2, x, y);
            }
            "Z" => s.push_str("Z "),
            other => debug!("unknown path action {other}"),
        }
    }

    s
}

/// Render a line-end marker into `draw:marker-*` properties.
fn write_arrow(props: &mut PropertyList, name: &str, arrow: &Arrow, pen_width: f64) {
    let origin = Point::ZERO;
    let line_end = Point::new(arrow.line_end_x, 0.0).rotate(FRAC_PI_2, &origin);

    let mut dist: f64 = 1.0;

    let mut curves = arrow.curves.clone();
    for curve in &mut curves {
        let min_y = curve
            .points
            .iter()
            .map(|p| p.y)
            .fold(f64::INFINITY, f64::min);
        let max_y = curve
            .points
            .iter()
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max);
        if max_y.is_finite() && min_y.is_finite() {
            dist = dist.max((max_y - min_y).abs());
        }

        for p in &mut curve.points {
            *p = p.rotate(FRAC_PI_2, &origin).move_by(0.0, -line_end.y);
        }
    }

    props.insert_str(
        &format!("draw:marker-{}-viewbox", name),
        "-10 -10 10 10",
    );
    props.insert_str(
        &format!("draw:marker-{}-path", name),
        path_to_string(&create_path(&curves, 0.0, 0.0)),
    );
    props.insert_inch(&format!("draw:marker-{}-width", name), pen_width * dist);
    props.insert_bool(&format!("draw:marker-{}-center", name), true);
}

/// Cell border string: width, style, and color.
fn write_border(props: &mut PropertyList, name: &str, pen: &Pen) {
    if pen.is_invisible {
        return;
    }
    props.insert_str(name, format!("{}in solid {}", pen.width, pen.color.to_hex()));
}

/// Collects parser output and forwards it to a [`DrawingSink`].
pub struct Collector<'s> {
    sink: &'s mut dyn DrawingSink,
    page_settings: PageSettings,
    document_started: bool,
    page_started: bool,
    layer_started: bool,
    style: Style,
}

impl<'s> Collector<'s> {
    /// Create a collector emitting to the given sink.
    pub fn new(sink: &'s mut dyn DrawingSink) -> Self {
        Self {
            sink,
            page_settings: PageSettings::default(),
            document_started: false,
            page_started: false,
            layer_started: false,
            style: Style::default(),
        }
    }

    pub fn start_document(&mut self) {
        if self.document_started {
            return;
        }

        self.sink.start_document(&PropertyList::new());
        self.document_started = true;
    }

    pub fn end_document(&mut self) {
        if !self.document_started {
            return;
        }

        if self.page_started {
            self.end_page();
        }

        self.sink.end_document();
        self.document_started = false;
    }

    pub fn start_page(&mut self, page_settings: &PageSettings) {
        if self.page_started {
            return;
        }

        if self.layer_started {
            self.end_layer();
        }

        let mut props = PropertyList::new();
        props.insert_inch("svg:width", page_settings.width);
        props.insert_inch("svg:height", page_settings.height);
        props.insert_str("draw:fill", "solid");
        props.insert_str("draw:fill-color", page_settings.color.to_hex());

        self.sink.start_page(&props);

        self.page_settings = *page_settings;
        self.page_started = true;
    }

    pub fn end_page(&mut self) {
        if !self.page_started {
            return;
        }

        if self.layer_started {
            self.end_layer();
        }

        self.sink.end_page();
        self.page_started = false;
    }

    pub fn start_layer(&mut self) {
        if self.layer_started {
            return;
        }

        self.sink.start_layer(&PropertyList::new());
        self.layer_started = true;
    }

    pub fn end_layer(&mut self) {
        if !self.layer_started {
            return;
        }

        self.sink.end_layer();
        self.layer_started = false;
    }

    pub fn start_group(&mut self) {
        self.sink.open_group(&PropertyList::new());
    }

    pub fn end_group(&mut self) {
        self.sink.close_group();
    }

    /// Install the style applied to subsequently collected shapes.
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    fn page_x(&self, canvas_x: f64) -> f64 {
        canvas_x - self.page_settings.left_offset
    }

    fn page_y(&self, canvas_y: f64) -> f64 {
        canvas_y - self.page_settings.top_offset
    }

    pub fn collect_path(&mut self, curve: &Curve) {
        self.collect_path_list(std::slice::from_ref(curve));
    }

    pub fn collect_path_list(&mut self, curves: &[Curve]) {
        let mut props = PropertyList::new();

        // Suppress fill on open paths; some sinks auto-fill them otherwise.
        let no_fill = !curves.iter().any(|c| c.closed);
        self.write_style(&mut props, no_fill);
        self.sink.set_style(&props);
        props.clear();

        let path = create_path(
            curves,
            self.page_settings.left_offset,
            self.page_settings.top_offset,
        );
        props.insert_vector("svg:d", path);

        self.sink.draw_path(&props);
    }

    pub fn collect_ellipse(&mut self, c: &Point, rx: f64, ry: f64, rotation: f64) {
        let mut props = PropertyList::new();

        self.write_style(&mut props, false);
        self.sink.set_style(&props);
        props.clear();

        props.insert_inch("svg:cx", self.page_x(c.x));
        props.insert_inch("svg:cy", self.page_y(c.y));
        props.insert_inch("svg:rx", rx);
        props.insert_inch("svg:ry", ry);
        if !almost_zero(rotation) {
            // The sink's rotation convention is opposite.
            props.insert_double("librevenge:rotate", -rad2deg(rotation), Unit::Generic);
        }

        self.sink.draw_ellipse(&props);
    }

    #[allow(clippy::too_many_arguments)]
    pub fn collect_arc(
        &mut self,
        c: &Point,
        rx: f64,
        ry: f64,
        begin_angle: f64,
        end_angle: f64,
        closed: bool,
        rotation: f64,
    ) {
        let mut props = PropertyList::new();

        self.write_style(&mut props, !closed);
        self.sink.set_style(&props);
        props.clear();

        let mut begin_point = ellipse_point(c, rx, ry, begin_angle);
        let mut end_point = ellipse_point(c, rx, ry, end_angle);

        if !almost_zero(rotation) {
            begin_point = begin_point.rotate(rotation, c);
            end_point = end_point.rotate(rotation, c);
        }

        let angle_diff = (end_angle - begin_angle).abs();
        let large_arc = (begin_angle < end_angle && angle_diff > PI)
            || (begin_angle > end_angle && angle_diff < PI);

        let mut path = Vec::new();

        let mut part = PropertyList::new();
        part.insert_str("librevenge:path-action", "M");
        part.insert_inch("svg:x", self.page_x(begin_point.x));
        part.insert_inch("svg:y", self.page_y(begin_point.y));
        path.push(part);

        let mut part = PropertyList::new();
        part.insert_str("librevenge:path-action", "A");
        part.insert_inch("svg:rx", rx);
        part.insert_inch("svg:ry", ry);
        part.insert_int("librevenge:large-arc", i32::from(large_arc));
        part.insert_int("librevenge:sweep", 1);
        part.insert_inch("svg:x", self.page_x(end_point.x));
        part.insert_inch("svg:y", self.page_y(end_point.y));
        path.push(part);

        if closed {
            let mut part = PropertyList::new();
            part.insert_str("librevenge:path-action", "L");
            part.insert_inch("svg:x", self.page_x(c.x));
            part.insert_inch("svg:y", self.page_y(c.y));
            path.push(part);

            let mut part = PropertyList::new();
            part.insert_str("librevenge:path-action", "Z");
            path.push(part);
        }

        props.insert_vector("svg:d", path);

        self.sink.draw_path(&props);
    }

    /// Replicate the peak curve `peaks_count` times around the center and
    /// emit the polygon as a closed path.
    #[allow(clippy::too_many_arguments)]
    pub fn collect_polygon(
        &mut self,
        c: &Point,
        rx: f64,
        ry: f64,
        peaks_count: u32,
        peak: &Curve,
        rotation: f64,
        mirror_horizontal: bool,
        mirror_vertical: bool,
    ) {
        if peak.points.len() < 2 {
            return;
        }

        let peak_angle = 2.0 * PI / f64::from(peaks_count);

        // One side of the polygon in a unit square; the center of the
        // future polygon is the origin.
        let side: Vec<Point> = peak
            .points
            .iter()
            .map(|p| ellipse_point(&Point::ZERO, p.y, p.y, p.x * peak_angle))
            .collect();

        let mut polygon = Curve {
            points: Vec::with_capacity(side.len() * peaks_count as usize),
            section_types: Vec::with_capacity(peak.section_types.len() * peaks_count as usize),
            closed: true,
        };

        for i in 0..peaks_count {
            let skip = usize::from(i != 0);
            let angle = f64::from(i) * peak_angle;
            polygon.points.extend(
                side.iter()
                    .skip(skip)
                    .map(|p| p.rotate(angle, &Point::ZERO)),
            );
            polygon.section_types.extend(peak.section_types.iter().copied());
        }

        // Fit the polygon into the bounding box and mirror.
        for p in &mut polygon.points {
            p.x *= rx;
            p.y *= ry;
            *p = p.move_by(c.x, c.y);

            p.y = -p.y;
            *p = p.move_by(0.0, 2.0 * c.y);

            if mirror_horizontal {
                p.x = -p.x;
                *p = p.move_by(2.0 * c.x, 0.0);
            }
            if mirror_vertical {
                p.y = -p.y;
                *p = p.move_by(0.0, 2.0 * c.y);
            }

            *p = p.rotate(rotation, c);
        }

        self.collect_path(&polygon);
    }

    pub fn collect_text_object(
        &mut self,
        text: &Text,
        top_left: &Point,
        width: f64,
        height: f64,
        align: VerticalAlignment,
        rotation: f64,
    ) {
        let mut props = PropertyList::new();

        props.insert_inch("svg:x", self.page_x(top_left.x));
        props.insert_inch("svg:y", self.page_y(top_left.y));
        props.insert_inch("svg:width", width);
        props.insert_inch("svg:height", height);

        let vertical_align = match align {
            VerticalAlignment::Top => "top",
            VerticalAlignment::Middle => "middle",
            VerticalAlignment::Bottom => "bottom",
        };
        props.insert_str("draw:textarea-vertical-align", vertical_align);

        if !almost_zero(rotation) {
            props.insert_double("librevenge:rotate", rad2deg(rotation), Unit::Generic);
        }

        self.sink.start_text_object(&props);

        self.collect_text(text);

        self.sink.end_text_object();
    }

    fn collect_text(&mut self, text: &Text) {
        for paragraph in &text.paragraphs {
            let mut props = PropertyList::new();

            props.insert_double("fo:line-height", paragraph.style.line_spacing, Unit::Percent);

            let align = match paragraph.style.alignment {
                HorizontalAlignment::Left => "left",
                HorizontalAlignment::Right => "end",
                HorizontalAlignment::Center => "center",
                HorizontalAlignment::Block | HorizontalAlignment::Full => "justify",
            };
            props.insert_str("fo:text-align", align);

            self.sink.open_paragraph(&props);

            for span in &paragraph.spans {
                let mut props = PropertyList::new();

                props.insert_str("style:font-name", span.font.name.clone());
                props.insert_double("fo:font-size", span.font.size, Unit::Point);
                props.insert_str(
                    "fo:font-weight",
                    if span.font.is_bold { "bold" } else { "normal" },
                );
                props.insert_str(
                    "fo:font-style",
                    if span.font.is_italic { "italic" } else { "normal" },
                );
                props.insert_bool("style:text-outline", span.font.outline.is_some());

                if let Some(Fill::Solid(color)) = &span.font.fill {
                    props.insert_str("fo:color", color.to_hex());
                }

                self.sink.open_span(&props);

                // Consecutive spaces collapse into a single character plus
                // explicit insert-space calls; hard line breaks are dropped.
                let mut was_space = false;
                let mut cur_text = String::new();

                for ch in span.text.chars() {
                    match ch {
                        '\r' | '\n' => {}
                        ' ' => {
                            if was_space {
                                self.flush_text(&mut cur_text);
                                self.sink.insert_space();
                            } else {
                                was_space = true;
                                cur_text.push(' ');
                            }
                        }
                        _ => {
                            was_space = false;
                            cur_text.push(ch);
                        }
                    }
                }

                self.flush_text(&mut cur_text);

                self.sink.close_span();
            }

            self.sink.close_paragraph();
        }
    }

    fn flush_text(&mut self, text: &mut String) {
        if !text.is_empty() {
            self.sink.insert_text(text);
            text.clear();
        }
    }

    pub fn collect_table(&mut self, table: &Table) {
        let mut props = PropertyList::new();

        props.insert_inch("svg:x", self.page_x(table.top_left.x));
        props.insert_inch("svg:y", self.page_y(table.top_left.y));
        props.insert_inch("svg:width", table.width);
        props.insert_inch("svg:height", table.height);

        let column_sizes: Vec<PropertyList> = table
            .columns
            .iter()
            .map(|col| {
                let mut col_props = PropertyList::new();
                col_props.insert_inch("style:column-width", col.width);
                col_props
            })
            .collect();
        props.insert_vector("librevenge:table-columns", column_sizes);

        self.sink.start_table_object(&props);

        for row in &table.rows {
            let mut row_props = PropertyList::new();
            row_props.insert_inch("style:row-height", row.height);
            self.sink.open_table_row(&row_props);

            for cell in &row.cells {
                let mut cell_props = PropertyList::new();

                if let Some(Fill::Solid(color)) = &cell.fill {
                    cell_props.insert_str("fo:background-color", color.to_hex());
                }

                cell_props.insert_str("draw:textarea-vertical-align", "middle");

                if let Some(pen) = &cell.left_border {
                    write_border(&mut cell_props, "fo:border-left", pen);
                }
                if let Some(pen) = &cell.right_border {
                    write_border(&mut cell_props, "fo:border-right", pen);
                }
                if let Some(pen) = &cell.top_border {
                    write_border(&mut cell_props, "fo:border-top", pen);
                }
                if let Some(pen) = &cell.bottom_border {
                    write_border(&mut cell_props, "fo:border-bottom", pen);
                }

                self.sink.open_table_cell(&cell_props);

                self.collect_text(&cell.text);

                self.sink.close_table_cell();
            }

            self.sink.close_table_row();
        }

        self.sink.end_table_object();
    }

    #[allow(clippy::too_many_arguments)]
    pub fn collect_image(
        &mut self,
        image: &Image,
        top_left: &Point,
        width: f64,
        height: f64,
        rotation: f64,
        mirror_horizontal: bool,
        mirror_vertical: bool,
    ) {
        let mut props = PropertyList::new();

        self.write_style(&mut props, false);

        if let Some(transparency) = &self.style.transparency {
            props.insert_double("draw:opacity", transparency.opacity(), Unit::Percent);
        }

        self.sink.set_style(&props);
        props.clear();

        props.insert_inch("svg:x", self.page_x(top_left.x));
        props.insert_inch("svg:y", self.page_y(top_left.y));
        props.insert_inch("svg:width", width);
        props.insert_inch("svg:height", height);
        if !almost_zero(rotation) {
            props.insert_double("librevenge:rotate", rad2deg(rotation), Unit::Generic);
        }
        props.insert_bool("draw:mirror-vertical", mirror_vertical);
        props.insert_bool("draw:mirror-horizontal", mirror_horizontal);
        props.insert_str("librevenge:mime-type", "image/png");
        props.insert_binary("office:binary-data", image.data.clone());

        self.sink.draw_graphic_object(&props);
    }

    /// Push the default style bag, then overlay pen, fill, and shadow.
    ///
    /// `no_fill` ignores the fill even when present (open paths).
    fn write_style(&mut self, props: &mut PropertyList, no_fill: bool) {
        props.insert_str("draw:stroke", "none");
        props.insert_str("draw:fill", "none");

        let style = self.style.clone();

        if let Some(pen) = &style.pen {
            self.write_pen(props, pen);
        }

        if !no_fill {
            if let Some(fill) = &style.fill {
                self.write_fill(props, fill);
            }
        }

        if let Some(shadow) = &style.shadow {
            self.write_shadow(props, shadow);
        }
    }

    fn write_pen(&mut self, props: &mut PropertyList, pen: &Pen) {
        props.insert_str("svg:stroke-color", pen.color.to_hex());
        if !almost_zero(pen.width) {
            props.insert_inch("svg:stroke-width", pen.width);
        }

        if !pen.dash_pattern.is_empty() {
            let dots1 = pen.dash_pattern[0];
            let mut dots2 = pen.dash_pattern[0];
            let mut dist = pen.dash_distance;
            if pen.dash_pattern.len() >= 3 {
                dist = pen.dash_pattern[1];
                dots2 = pen.dash_pattern[2];
            }

            props.insert_str("draw:stroke", "dash");
            props.insert_int("draw:dots1", 1);
            props.insert_double("draw:dots1-length", dots1, Unit::Percent);
            props.insert_int("draw:dots2", 1);
            props.insert_double("draw:dots2-length", dots2, Unit::Percent);
            props.insert_double("draw:distance", dist, Unit::Percent);
        } else {
            props.insert_str("draw:stroke", "solid");
        }

        let linecap = match pen.line_cap_type {
            LineCapType::Round => "round",
            LineCapType::Flat => "square",
            LineCapType::Butt | LineCapType::Pointed => "butt",
        };
        props.insert_str("svg:stroke-linecap", linecap);

        let linejoin = match pen.line_join_type {
            LineJoinType::Miter => "miter",
            LineJoinType::Round => "round",
            LineJoinType::Bevel => "bevel",
        };
        props.insert_str("svg:stroke-linejoin", linejoin);

        if let Some(transparency) = &self.style.transparency {
            props.insert_double("svg:stroke-opacity", transparency.opacity(), Unit::Percent);
        }

        if let Some(arrow) = &pen.start_arrow {
            write_arrow(props, "start", arrow, pen.width);
        }
        if let Some(arrow) = &pen.end_arrow {
            write_arrow(props, "end", arrow, pen.width);
        }
    }

    fn write_fill(&mut self, props: &mut PropertyList, fill: &Fill) {
        let transparency = self.style.transparency;

        match fill {
            Fill::Solid(color) => {
                props.insert_str("draw:fill", "solid");
                props.insert_str("draw:fill-color", color.to_hex());

                if let Some(transparency) = &transparency {
                    props.insert_double("draw:opacity", transparency.opacity(), Unit::Percent);
                }
            }
            Fill::Gradient(gradient) => {
                if gradient.stops.len() < 2 {
                    return;
                }

                props.insert_str("draw:fill", "gradient");

                let mut stops = gradient.stops.clone();
                if gradient.gradient_type == GradientType::Linear {
                    stops.sort_by(|a, b| a.offset.total_cmp(&b.offset));
                } else {
                    stops.sort_by(|a, b| b.offset.total_cmp(&a.offset));
                    for stop in &mut stops {
                        stop.offset = 1.0 - stop.offset;
                    }
                }

                let stop_opacity = transparency.as_ref().map_or(1.0, Transparency::opacity);
                let gradient_vector: Vec<PropertyList> = stops
                    .iter()
                    .map(|stop| {
                        let mut grad = PropertyList::new();
                        grad.insert_double("svg:offset", stop.offset, Unit::Percent);
                        grad.insert_str("svg:stop-color", stop.color.to_hex());
                        grad.insert_double("svg:stop-opacity", stop_opacity, Unit::Percent);
                        grad
                    })
                    .collect();

                match gradient.gradient_type {
                    GradientType::Radial => {
                        props.insert_str("draw:style", "radial");
                        props.insert_double("draw:cx", gradient.center.x, Unit::Percent);
                        props.insert_double("draw:cy", gradient.center.y, Unit::Percent);
                        props.insert_double(
                            "draw:border",
                            0.25 - gradient.center.distance(&Point::new(0.5, 0.5)),
                            Unit::Percent,
                        );
                        props.insert_vector("svg:radialGradient", gradient_vector);
                    }
                    _ => {
                        props.insert_str("draw:style", "linear");
                        props.insert_double(
                            "draw:angle",
                            rad2deg(gradient.angle + FRAC_PI_2),
                            Unit::Generic,
                        );
                        props.insert_vector("svg:linearGradient", gradient_vector);
                    }
                }
            }
            Fill::Image(image_fill) => {
                props.insert_str("draw:fill", "bitmap");

                props.insert_binary("draw:fill-image", image_fill.image.data.clone());
                props.insert_str("librevenge:mime-type", "image/png");

                if image_fill.tile {
                    props.insert_str("style:repeat", "repeat");
                    props.insert_inch("draw:fill-image-width", image_fill.tile_width);
                    props.insert_inch("draw:fill-image-height", image_fill.tile_height);
                    props.insert_str("draw:fill-image-ref-point", "top-left");
                } else {
                    props.insert_str("style:repeat", "stretch");
                }

                if let Some(transparency) = &transparency {
                    props.insert_double("draw:opacity", transparency.opacity(), Unit::Percent);
                }
            }
        }

        props.insert_str("svg:fill-rule", "evenodd");
    }

    fn write_shadow(&mut self, props: &mut PropertyList, shadow: &Shadow) {
        props.insert_str("draw:shadow", "visible");
        props.insert_str("draw:shadow-color", shadow.color.to_hex());
        props.insert_double("draw:shadow-opacity", shadow.opacity, Unit::Percent);
        props.insert_inch("draw:shadow-offset-x", shadow.offset.x);
        props.insert_inch("draw:shadow-offset-y", shadow.offset.y);
    }
}
