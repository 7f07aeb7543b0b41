//! Shared test utilities: a recording sink and synthetic file builders.

#![allow(dead_code)]

pub mod builders;

use zonerust::{DrawingSink, PropertyList};

/// One recorded sink callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    StartDocument(PropertyList),
    EndDocument,
    StartPage(PropertyList),
    EndPage,
    StartLayer(PropertyList),
    EndLayer,
    OpenGroup(PropertyList),
    CloseGroup,
    SetStyle(PropertyList),
    DrawPath(PropertyList),
    DrawEllipse(PropertyList),
    DrawGraphicObject(PropertyList),
    StartTextObject(PropertyList),
    EndTextObject,
    OpenParagraph(PropertyList),
    CloseParagraph,
    OpenSpan(PropertyList),
    CloseSpan,
    InsertText(String),
    InsertSpace,
    StartTableObject(PropertyList),
    EndTableObject,
    OpenTableRow(PropertyList),
    CloseTableRow,
    OpenTableCell(PropertyList),
    CloseTableCell,
}

impl Event {
    /// Short name of the callback, for sequence assertions.
    pub fn name(&self) -> &'static str {
        match self {
            Event::StartDocument(_) => "startDocument",
            Event::EndDocument => "endDocument",
            Event::StartPage(_) => "startPage",
            Event::EndPage => "endPage",
            Event::StartLayer(_) => "startLayer",
            Event::EndLayer => "endLayer",
            Event::OpenGroup(_) => "openGroup",
            Event::CloseGroup => "closeGroup",
            Event::SetStyle(_) => "setStyle",
            Event::DrawPath(_) => "drawPath",
            Event::DrawEllipse(_) => "drawEllipse",
            Event::DrawGraphicObject(_) => "drawGraphicObject",
            Event::StartTextObject(_) => "startTextObject",
            Event::EndTextObject => "endTextObject",
            Event::OpenParagraph(_) => "openParagraph",
            Event::CloseParagraph => "closeParagraph",
            Event::OpenSpan(_) => "openSpan",
            Event::CloseSpan => "closeSpan",
            Event::InsertText(_) => "insertText",
            Event::InsertSpace => "insertSpace",
            Event::StartTableObject(_) => "startTableObject",
            Event::EndTableObject => "endTableObject",
            Event::OpenTableRow(_) => "openTableRow",
            Event::CloseTableRow => "closeTableRow",
            Event::OpenTableCell(_) => "openTableCell",
            Event::CloseTableCell => "closeTableCell",
        }
    }

    /// The property list carried by the callback, if any.
    pub fn props(&self) -> Option<&PropertyList> {
        match self {
            Event::StartDocument(p)
            | Event::StartPage(p)
            | Event::StartLayer(p)
            | Event::OpenGroup(p)
            | Event::SetStyle(p)
            | Event::DrawPath(p)
            | Event::DrawEllipse(p)
            | Event::DrawGraphicObject(p)
            | Event::StartTextObject(p)
            | Event::OpenParagraph(p)
            | Event::OpenSpan(p)
            | Event::StartTableObject(p)
            | Event::OpenTableRow(p)
            | Event::OpenTableCell(p) => Some(p),
            _ => None,
        }
    }
}

/// Sink that records every callback for later inspection.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<Event>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of all recorded callbacks, in order.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.iter().map(Event::name).collect()
    }

    /// Number of callbacks with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.events.iter().filter(|e| e.name() == name).count()
    }

    /// First callback with the given name.
    pub fn find(&self, name: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.name() == name)
    }
}

impl DrawingSink for RecordingSink {
    fn start_document(&mut self, props: &PropertyList) {
        self.events.push(Event::StartDocument(props.clone()));
    }

    fn end_document(&mut self) {
        self.events.push(Event::EndDocument);
    }

    fn start_page(&mut self, props: &PropertyList) {
        self.events.push(Event::StartPage(props.clone()));
    }

    fn end_page(&mut self) {
        self.events.push(Event::EndPage);
    }

    fn start_layer(&mut self, props: &PropertyList) {
        self.events.push(Event::StartLayer(props.clone()));
    }

    fn end_layer(&mut self) {
        self.events.push(Event::EndLayer);
    }

    fn open_group(&mut self, props: &PropertyList) {
        self.events.push(Event::OpenGroup(props.clone()));
    }

    fn close_group(&mut self) {
        self.events.push(Event::CloseGroup);
    }

    fn set_style(&mut self, props: &PropertyList) {
        self.events.push(Event::SetStyle(props.clone()));
    }

    fn draw_path(&mut self, props: &PropertyList) {
        self.events.push(Event::DrawPath(props.clone()));
    }

    fn draw_ellipse(&mut self, props: &PropertyList) {
        self.events.push(Event::DrawEllipse(props.clone()));
    }

    fn draw_graphic_object(&mut self, props: &PropertyList) {
        self.events.push(Event::DrawGraphicObject(props.clone()));
    }

    fn start_text_object(&mut self, props: &PropertyList) {
        self.events.push(Event::StartTextObject(props.clone()));
    }

    fn end_text_object(&mut self) {
        self.events.push(Event::EndTextObject);
    }

    fn open_paragraph(&mut self, props: &PropertyList) {
        self.events.push(Event::OpenParagraph(props.clone()));
    }

    fn close_paragraph(&mut self) {
        self.events.push(Event::CloseParagraph);
    }

    fn open_span(&mut self, props: &PropertyList) {
        self.events.push(Event::OpenSpan(props.clone()));
    }

    fn close_span(&mut self) {
        self.events.push(Event::CloseSpan);
    }

    fn insert_text(&mut self, text: &str) {
        self.events.push(Event::InsertText(text.to_string()));
    }

    fn insert_space(&mut self) {
        self.events.push(Event::InsertSpace);
    }

    fn start_table_object(&mut self, props: &PropertyList) {
        self.events.push(Event::StartTableObject(props.clone()));
    }

    fn end_table_object(&mut self) {
        self.events.push(Event::EndTableObject);
    }

    fn open_table_row(&mut self, props: &PropertyList) {
        self.events.push(Event::OpenTableRow(props.clone()));
    }

    fn close_table_row(&mut self) {
        self.events.push(Event::CloseTableRow);
    }

    fn open_table_cell(&mut self, props: &PropertyList) {
        self.events.push(Event::OpenTableCell(props.clone()));
    }

    fn close_table_cell(&mut self) {
        self.events.push(Event::CloseTableCell);
    }
}
