//! Debug dump tool: prints the drawing-sink call sequence of a Zoner file.

use std::process::exit;

use zonerust::{DrawingSink, MemoryStream, PropertyList, ZmfDocument, VERSION};

/// Sink that prints every callback, optionally as a call-graph nesting
/// trace.
struct RawSink {
    print_callgraph: bool,
    indent: usize,
}

impl RawSink {
    fn new(print_callgraph: bool) -> Self {
        Self {
            print_callgraph,
            indent: 0,
        }
    }

    fn format_props(props: &PropertyList) -> String {
        let entries: Vec<String> = props
            .iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        entries.join(", ")
    }

    /// Print one line at the current nesting depth.
    fn line(&self, content: &str) {
        println!("{}{}", "  ".repeat(self.indent), content);
    }

    fn call(&self, name: &str, props: Option<&PropertyList>) {
        if self.print_callgraph {
            self.line(name);
            return;
        }
        match props {
            Some(props) => self.line(&format!("{}({})", name, Self::format_props(props))),
            None => self.line(name),
        }
    }

    fn open(&mut self, name: &str, props: Option<&PropertyList>) {
        self.call(name, props);
        self.indent += 1;
    }

    fn close(&mut self, name: &str) {
        self.indent = self.indent.saturating_sub(1);
        self.call(name, None);
    }
}

impl DrawingSink for RawSink {
    fn start_document(&mut self, props: &PropertyList) {
        self.open("startDocument", Some(props));
    }

    fn end_document(&mut self) {
        self.close("endDocument");
    }

    fn start_page(&mut self, props: &PropertyList) {
        self.open("startPage", Some(props));
    }

    fn end_page(&mut self) {
        self.close("endPage");
    }

    fn start_layer(&mut self, props: &PropertyList) {
        self.open("startLayer", Some(props));
    }

    fn end_layer(&mut self) {
        self.close("endLayer");
    }

    fn open_group(&mut self, props: &PropertyList) {
        self.open("openGroup", Some(props));
    }

    fn close_group(&mut self) {
        self.close("closeGroup");
    }

    fn set_style(&mut self, props: &PropertyList) {
        self.call("setStyle", Some(props));
    }

    fn draw_path(&mut self, props: &PropertyList) {
        self.call("drawPath", Some(props));
    }

    fn draw_ellipse(&mut self, props: &PropertyList) {
        self.call("drawEllipse", Some(props));
    }

    fn draw_graphic_object(&mut self, props: &PropertyList) {
        self.call("drawGraphicObject", Some(props));
    }

    fn start_text_object(&mut self, props: &PropertyList) {
        self.open("startTextObject", Some(props));
    }

    fn end_text_object(&mut self) {
        self.close("endTextObject");
    }

    fn open_paragraph(&mut self, props: &PropertyList) {
        self.open("openParagraph", Some(props));
    }

    fn close_paragraph(&mut self) {
        self.close("closeParagraph");
    }

    fn open_span(&mut self, props: &PropertyList) {
        self.open("openSpan", Some(props));
    }

    fn close_span(&mut self) {
        self.close("closeSpan");
    }

    fn insert_text(&mut self, text: &str) {
        if self.print_callgraph {
            self.call("insertText", None);
        } else {
            self.line(&format!("insertText({})", text));
        }
    }

    fn insert_space(&mut self) {
        self.call("insertSpace", None);
    }

    fn start_table_object(&mut self, props: &PropertyList) {
        self.open("startTableObject", Some(props));
    }

    fn end_table_object(&mut self) {
        self.close("endTableObject");
    }

    fn open_table_row(&mut self, props: &PropertyList) {
        self.open("openTableRow", Some(props));
    }

    fn close_table_row(&mut self) {
        self.close("closeTableRow");
    }

    fn open_table_cell(&mut self, props: &PropertyList) {
        self.open("openTableCell", Some(props));
    }

    fn close_table_cell(&mut self) {
        self.close("closeTableCell");
    }
}

fn print_usage() -> i32 {
    println!("`zmf2raw' is used to test zonerust.");
    println!();
    println!("Usage: zmf2raw [OPTION] INPUT");
    println!("\t--callgraph           display the call graph nesting level");
    println!("\t--help                show this help message");
    println!("\t--version             show version information and exit");
    -1
}

fn print_version() -> i32 {
    println!("zmf2raw {}", VERSION);
    0
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() {
        exit(print_usage());
    }

    let mut file = None;
    let mut print_callgraph = false;

    for arg in &args {
        if arg == "--callgraph" {
            print_callgraph = true;
        } else if arg == "--version" {
            exit(print_version());
        } else if file.is_none() && !arg.starts_with("--") {
            file = Some(arg.clone());
        } else {
            exit(print_usage());
        }
    }

    let Some(file) = file else {
        exit(print_usage());
    };

    let data = match std::fs::read(&file) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("ERROR: cannot read {}: {}", file, err);
            exit(1);
        }
    };

    let mut stream = MemoryStream::new(data);

    if !ZmfDocument::is_supported(&mut stream) {
        eprintln!("ERROR: Unsupported file format (unsupported version) or file is encrypted!");
        exit(1);
    }

    let mut sink = RawSink::new(print_callgraph);
    ZmfDocument::parse(&mut stream, &mut sink);
}
