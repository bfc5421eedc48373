//! Marrow CLI
//!
//! Parse an HTML file or string and print what the parser made of it: the
//! tree in html5lib dump format, the token stream, the parse errors, JSON, or
//! the document serialized back to HTML.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{debug, info};
use marrow_dom::{DomTree, Namespace, NodeId, NodeType};
use marrow_html::{
    FragmentContext, HTMLParser, HTMLTokenizer, ParseError, ParseOutput, ParseStatus,
    ParserOptions, parse_document, parse_fragment, print_tree, serialize_with_scripting,
};
use owo_colors::OwoColorize;
use serde_json::{Map, Value, json};

/// Inspect how an HTML document is tokenized and parsed
#[derive(Parser, Debug)]
#[command(name = "marrow")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Print the tree of a file
    marrow index.html

    # Parse inline HTML
    marrow --html '<p>one<p>two'

    # Show the token stream
    marrow --tokens --html '<a href=x>link</a>'

    # Parse as the contents of a <td>
    marrow --fragment td --html 'x</td>y'

    # Feed the input 16 characters at a time
    marrow --chunk-size 16 index.html

    # JSON with source locations
    marrow --json --locations index.html
"#)]
struct Cli {
    /// Path to an HTML file
    #[arg(value_name = "FILE")]
    path: Option<PathBuf>,

    /// Parse HTML string directly instead of a file
    #[arg(long, value_name = "HTML")]
    html: Option<String>,

    /// Print the token stream instead of the tree
    #[arg(short = 't', long)]
    tokens: bool,

    /// Print the tree as JSON, with the parse errors
    #[arg(short = 'j', long, conflicts_with = "tokens")]
    json: bool,

    /// Serialize the tree back to HTML
    #[arg(short = 's', long, conflicts_with_all = ["tokens", "json"])]
    serialize: bool,

    /// Only print the parse errors
    #[arg(short = 'e', long, conflicts_with_all = ["tokens", "json", "serialize"])]
    errors_only: bool,

    /// Parse as a fragment in this context element (`svg` and `math` are foreign)
    #[arg(long, value_name = "TAG")]
    fragment: Option<String>,

    /// Parse with the scripting flag disabled
    #[arg(long)]
    no_scripting: bool,

    /// Record source locations on every node (shown in JSON output)
    #[arg(long)]
    locations: bool,

    /// Feed the document to the parser this many characters at a time
    #[arg(long, value_name = "N", conflicts_with = "fragment")]
    chunk_size: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let html = load_input(&cli)?;

    if cli.tokens {
        print_tokens(&html);
        return Ok(());
    }

    let options = ParserOptions::default()
        .scripting(!cli.no_scripting)
        .source_locations(cli.locations);
    let output = match (&cli.fragment, cli.chunk_size) {
        (Some(context), _) => parse_fragment(&html, fragment_context(context), options),
        (None, Some(size)) => parse_in_chunks(&html, size, options)?,
        (None, None) => parse_document(&html, options),
    };
    info!("parsed {} characters with {} errors", html.chars().count(), output.errors.len());

    if cli.json {
        let document = json!({
            "document": node_to_json(&output.tree, NodeId::ROOT),
            "errors": output.errors,
        });
        println!("{}", serde_json::to_string_pretty(&document)?);
        return Ok(());
    }

    if cli.serialize {
        println!(
            "{}",
            serialize_with_scripting(&output.tree, NodeId::ROOT, !cli.no_scripting)
        );
    } else if !cli.errors_only {
        print_tree(&output.tree, NodeId::ROOT);
    }
    print_errors(&output.errors);
    Ok(())
}

/// Load the document from the CLI arguments
fn load_input(cli: &Cli) -> Result<String> {
    if let Some(ref html) = cli.html {
        Ok(html.clone())
    } else if let Some(ref path) = cli.path {
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    } else {
        anyhow::bail!("a file path or --html is required")
    }
}

fn fragment_context(name: &str) -> FragmentContext {
    let namespace = match name {
        "svg" => Namespace::Svg,
        "math" => Namespace::MathMl,
        _ => Namespace::Html,
    };
    FragmentContext::new(name, namespace)
}

/// Drive an [`HTMLParser`] by hand, resuming after every script.
fn parse_in_chunks(html: &str, size: usize, options: ParserOptions) -> Result<ParseOutput> {
    let mut parser = HTMLParser::new(options);
    let chars: Vec<char> = html.chars().collect();
    for chunk in chars.chunks(size.max(1)) {
        let chunk: String = chunk.iter().collect();
        let status = parser.write(&chunk)?;
        run_through_pauses(&mut parser, status)?;
    }
    let status = parser.end()?;
    run_through_pauses(&mut parser, status)?;
    Ok(parser.into_output())
}

fn run_through_pauses(parser: &mut HTMLParser, mut status: ParseStatus) -> Result<()> {
    while let ParseStatus::Paused { script } = status {
        if let Some(script) = script {
            let source = parser.tree().text_content(script);
            debug!("paused after script {script:?}: {source:?}");
        }
        status = parser.resume()?;
    }
    Ok(())
}

fn print_tokens(html: &str) {
    let mut tokenizer = HTMLTokenizer::new(html.to_string());
    tokenizer.run();
    let errors = tokenizer.take_errors();
    for spanned in tokenizer.into_spanned_tokens() {
        println!(
            "{} {}",
            format!("{}-{}", spanned.span.start, spanned.span.end).dimmed(),
            spanned.token
        );
    }
    print_errors(&errors);
}

fn print_errors(errors: &[ParseError]) {
    if errors.is_empty() {
        return;
    }
    eprintln!("\n{}", format!("{} parse errors", errors.len()).bold());
    for error in errors {
        eprintln!(
            "  {} {}",
            format!("{}:{}", error.line, error.column).dimmed(),
            error.code.yellow()
        );
    }
}

fn node_to_json(tree: &DomTree, id: NodeId) -> Value {
    let Some(node) = tree.get(id) else {
        return Value::Null;
    };
    let mut object = Map::new();
    match &node.node_type {
        NodeType::Document => {
            let _ = object.insert("type".into(), "document".into());
            let _ = object.insert("mode".into(), format!("{:?}", tree.mode()).into());
        }
        NodeType::DocumentFragment => {
            let _ = object.insert("type".into(), "fragment".into());
        }
        NodeType::DocumentType {
            name,
            public_id,
            system_id,
        } => {
            let _ = object.insert("type".into(), "doctype".into());
            let _ = object.insert("name".into(), name.as_str().into());
            let _ = object.insert("publicId".into(), public_id.as_str().into());
            let _ = object.insert("systemId".into(), system_id.as_str().into());
        }
        NodeType::Element(data) => {
            let attributes: Map<String, Value> = data
                .attrs
                .iter()
                .map(|(name, value)| (name.clone(), Value::from(value.as_str())))
                .collect();
            let _ = object.insert("type".into(), "element".into());
            let _ = object.insert("tagName".into(), data.tag_name.as_str().into());
            let _ = object.insert("namespace".into(), data.namespace.url().into());
            let _ = object.insert("attributes".into(), Value::Object(attributes));
        }
        NodeType::Text(text) => {
            let _ = object.insert("type".into(), "text".into());
            let _ = object.insert("content".into(), text.as_str().into());
        }
        NodeType::Comment(text) => {
            let _ = object.insert("type".into(), "comment".into());
            let _ = object.insert("content".into(), text.as_str().into());
        }
    }
    if let Some(location) = tree.location(id) {
        let _ = object.insert(
            "location".into(),
            json!({
                "start": [location.start.line, location.start.column],
                "end": [location.end.line, location.end.column],
            }),
        );
    }
    let children: Vec<Value> = tree
        .children(id)
        .iter()
        .map(|&child| node_to_json(tree, child))
        .collect();
    if !children.is_empty() {
        let _ = object.insert("children".into(), Value::Array(children));
    }
    Value::Object(object)
}
