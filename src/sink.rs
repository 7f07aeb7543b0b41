//! Drawing sink contract.
//!
//! The parsers reproduce a document as a sequence of semantic callbacks
//! against a [`DrawingSink`].  Every callback receives a [`PropertyList`],
//! an ordered bag of named values from the documented vocabulary
//! (`svg:x`, `draw:fill`, `librevenge:path-action`, ...), with units
//! declared per value.

use std::fmt;

use indexmap::IndexMap;

/// Unit of a numeric property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Generic,
    Inch,
    Point,
    Percent,
}

/// A single property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Bool(bool),
    Int(i32),
    Double(f64, Unit),
    Str(String),
    Binary(Vec<u8>),
    /// An ordered sequence of nested property lists (paths, gradient stops,
    /// table columns).
    Vector(Vec<PropertyList>),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Bool(b) => write!(f, "{}", b),
            PropertyValue::Int(i) => write!(f, "{}", i),
            PropertyValue::Double(v, Unit::Generic) => write!(f, "{}", v),
            PropertyValue::Double(v, Unit::Inch) => write!(f, "{}in", v),
            PropertyValue::Double(v, Unit::Point) => write!(f, "{}pt", v),
            PropertyValue::Double(v, Unit::Percent) => write!(f, "{}%", v * 100.0),
            PropertyValue::Str(s) => write!(f, "{}", s),
            PropertyValue::Binary(data) => write!(f, "<{} bytes>", data.len()),
            PropertyValue::Vector(items) => write!(f, "<{} elements>", items.len()),
        }
    }
}

/// An ordered map of property names to values.
///
/// Insertion order is preserved; inserting an existing name overwrites in
/// place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PropertyList {
    entries: IndexMap<String, PropertyValue>,
}

impl PropertyList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value.
    pub fn insert(&mut self, name: &str, value: PropertyValue) {
        self.entries.insert(name.to_string(), value);
    }

    /// Insert a string value.
    pub fn insert_str(&mut self, name: &str, value: impl Into<String>) {
        self.insert(name, PropertyValue::Str(value.into()));
    }

    /// Insert a boolean value.
    pub fn insert_bool(&mut self, name: &str, value: bool) {
        self.insert(name, PropertyValue::Bool(value));
    }

    /// Insert an integer value.
    pub fn insert_int(&mut self, name: &str, value: i32) {
        self.insert(name, PropertyValue::Int(value));
    }

    /// Insert a numeric value with a unit.
    pub fn insert_double(&mut self, name: &str, value: f64, unit: Unit) {
        self.insert(name, PropertyValue::Double(value, unit));
    }

    /// Insert a length in inches.
    pub fn insert_inch(&mut self, name: &str, value: f64) {
        self.insert_double(name, value, Unit::Inch);
    }

    /// Insert binary data.
    pub fn insert_binary(&mut self, name: &str, data: Vec<u8>) {
        self.insert(name, PropertyValue::Binary(data));
    }

    /// Insert a nested sequence of property lists.
    pub fn insert_vector(&mut self, name: &str, items: Vec<PropertyList>) {
        self.insert(name, PropertyValue::Vector(items));
    }

    /// Look up a value by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.get(name)
    }

    /// Look up a string value by name.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(PropertyValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a numeric value by name, ignoring its unit.
    pub fn get_double(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(PropertyValue::Double(v, _)) => Some(*v),
            Some(PropertyValue::Int(i)) => Some(f64::from(*i)),
            _ => None,
        }
    }

    /// Look up a nested sequence by name.
    pub fn get_vector(&self, name: &str) -> Option<&[PropertyList]> {
        match self.get(name) {
            Some(PropertyValue::Vector(items)) => Some(items),
            _ => None,
        }
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// The drawing callback interface the parsers emit to.
///
/// Group calls may nest; the sink maintains its own group stack.  All other
/// lifecycle calls arrive strictly paired and never interleaved.
pub trait DrawingSink {
    fn start_document(&mut self, props: &PropertyList);
    fn end_document(&mut self);

    fn start_page(&mut self, props: &PropertyList);
    fn end_page(&mut self);

    fn start_layer(&mut self, props: &PropertyList);
    fn end_layer(&mut self);

    fn open_group(&mut self, props: &PropertyList);
    fn close_group(&mut self);

    fn set_style(&mut self, props: &PropertyList);

    fn draw_path(&mut self, props: &PropertyList);
    fn draw_ellipse(&mut self, props: &PropertyList);
    fn draw_graphic_object(&mut self, props: &PropertyList);

    fn start_text_object(&mut self, props: &PropertyList);
    fn end_text_object(&mut self);
    fn open_paragraph(&mut self, props: &PropertyList);
    fn close_paragraph(&mut self);
    fn open_span(&mut self, props: &PropertyList);
    fn close_span(&mut self);
    fn insert_text(&mut self, text: &str);
    fn insert_space(&mut self);

    fn start_table_object(&mut self, props: &PropertyList);
    fn end_table_object(&mut self);
    fn open_table_row(&mut self, props: &PropertyList);
    fn close_table_row(&mut self);
    fn open_table_cell(&mut self, props: &PropertyList);
    fn close_table_cell(&mut self);
}
