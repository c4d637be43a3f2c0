use std::fs;
use std::io::{self, Read};

use clap::{Args, Parser, Subcommand, ValueEnum};
use outline::{GridSpec, Spacing, derive_edges, layout_records, pack_grid, parse};
use serde_json::{Value, json};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read {path}: {source}")]
    Input { path: String, source: io::Error },
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {message}")]
    ServerError { status: u16, message: String },
    #[error("grid: {0}")]
    Grid(#[from] outline::GridError),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "sitemap", about = "Sitemap builder CLI: local outline tools and server API")]
struct Cli {
    #[arg(long, env = "SITEMAP_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Ping,
    /// Parse an outline locally and print records, edges and positions.
    Outline {
        #[arg(default_value = "-", help = "Outline file path, or - for stdin")]
        input: String,
        #[arg(long, default_value_t = outline::layout::DEFAULT_HORIZONTAL_SPACING)]
        h_spacing: f64,
        #[arg(long, default_value_t = outline::layout::DEFAULT_VERTICAL_SPACING)]
        v_spacing: f64,
    },
    /// Pack an outline's pages into the export grid locally.
    Grid {
        #[arg(default_value = "-", help = "Outline file path, or - for stdin")]
        input: String,
        #[arg(long, default_value_t = 1440.0)]
        width: f64,
        #[arg(long, default_value_t = 1024.0)]
        height: f64,
        #[arg(long, default_value_t = outline::grid::DEFAULT_FRAMES_PER_ROW)]
        per_row: usize,
    },
    Doc(DocCommand),
    Sitemap(SitemapCommand),
    /// Export one design frame per page into a document.
    Export {
        doc_id: Uuid,
        #[arg(default_value = "-", help = "Outline file path, or - for stdin")]
        input: String,
        #[arg(long)]
        width: Option<f64>,
        #[arg(long)]
        height: Option<f64>,
    },
    /// Print the outline text of a document's latest diagram.
    Recover { doc_id: Uuid },
}

#[derive(Args, Debug)]
struct DocCommand {
    #[command(subcommand)]
    command: DocSubcommand,
}

#[derive(Subcommand, Debug)]
enum DocSubcommand {
    Create {
        #[arg(long, value_enum, default_value_t = Editor::Whiteboard)]
        editor: Editor,
        #[arg(long, default_value_t = false)]
        no_pages: bool,
        #[arg(long, default_value_t = false)]
        no_sections: bool,
        #[arg(long, default_value_t = false, help = "Make every font preload fail")]
        fail_preload: bool,
        #[arg(long, help = "Reject object creation after this many objects")]
        create_limit: Option<usize>,
    },
    Show {
        doc_id: Uuid,
    },
    Objects {
        doc_id: Uuid,
    },
    Notifications {
        doc_id: Uuid,
    },
    /// Close a document and free it on the server.
    Close {
        doc_id: Uuid,
    },
}

#[derive(Args, Debug)]
struct SitemapCommand {
    #[command(subcommand)]
    command: SitemapSubcommand,
}

#[derive(Subcommand, Debug)]
enum SitemapSubcommand {
    Build {
        doc_id: Uuid,
        #[arg(default_value = "-", help = "Outline file path, or - for stdin")]
        input: String,
        #[arg(long, value_enum, default_value_t = Mode::Create)]
        mode: Mode,
    },
    /// Count sitemaps and page design containers in a document.
    Count {
        doc_id: Uuid,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Editor {
    Whiteboard,
    Design,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    Create,
    Update,
    DeleteAll,
}

impl Mode {
    fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::DeleteAll => "delete-all",
        }
    }
}

impl Editor {
    fn as_str(self) -> &'static str {
        match self {
            Self::Whiteboard => "whiteboard",
            Self::Design => "design",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let base_url = cli.base_url.trim_end_matches('/').to_owned();

    match cli.command {
        Command::Ping => run_ping(&base_url).await,
        Command::Outline { input, h_spacing, v_spacing } => {
            let text = read_input(&input)?;
            print_json(&outline_report(&text, Spacing { horizontal: h_spacing, vertical: v_spacing })?)
        }
        Command::Grid { input, width, height, per_row } => {
            let text = read_input(&input)?;
            let spec = GridSpec { per_row, ..GridSpec::with_frame(width, height) };
            print_json(&grid_report(&text, &spec)?)
        }
        Command::Doc(doc) => run_doc(&base_url, doc).await,
        Command::Sitemap(sitemap) => run_sitemap(&base_url, sitemap).await,
        Command::Export { doc_id, input, width, height } => {
            let body = export_body(read_input(&input)?, width, height);
            let json = api_request(&base_url, reqwest::Method::POST, &format!("/api/documents/{doc_id}/export"), Some(body))
                .await?;
            print_json(&json)
        }
        Command::Recover { doc_id } => {
            let json = api_request(&base_url, reqwest::Method::GET, &format!("/api/documents/{doc_id}/outline"), None)
                .await?;
            match json.get("text").and_then(Value::as_str) {
                Some(text) => println!("{text}"),
                None => eprintln!("no diagram found"),
            }
            Ok(())
        }
    }
}

async fn run_ping(base_url: &str) -> Result<(), CliError> {
    let response = reqwest::get(format!("{base_url}/healthz")).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::ServerError { status: status.as_u16(), message: "health check failed".to_owned() });
    }
    println!("ok");
    Ok(())
}

async fn run_doc(base_url: &str, doc: DocCommand) -> Result<(), CliError> {
    let json = match doc.command {
        DocSubcommand::Create { editor, no_pages, no_sections, fail_preload, create_limit } => {
            let body = json!({
                "pages": !no_pages,
                "sections": !no_sections,
                "editor": editor.as_str(),
                "faults": { "preload": fail_preload, "create_limit": create_limit },
            });
            api_request(base_url, reqwest::Method::POST, "/api/documents", Some(body)).await?
        }
        DocSubcommand::Show { doc_id } => {
            api_request(base_url, reqwest::Method::GET, &format!("/api/documents/{doc_id}"), None).await?
        }
        DocSubcommand::Objects { doc_id } => {
            api_request(base_url, reqwest::Method::GET, &format!("/api/documents/{doc_id}/objects"), None).await?
        }
        DocSubcommand::Notifications { doc_id } => {
            let path = format!("/api/documents/{doc_id}/notifications");
            api_request(base_url, reqwest::Method::GET, &path, None).await?
        }
        DocSubcommand::Close { doc_id } => {
            api_request(base_url, reqwest::Method::DELETE, &format!("/api/documents/{doc_id}"), None).await?;
            println!("closed {doc_id}");
            return Ok(());
        }
    };
    print_json(&json)
}

async fn run_sitemap(base_url: &str, sitemap: SitemapCommand) -> Result<(), CliError> {
    let json = match sitemap.command {
        SitemapSubcommand::Build { doc_id, input, mode } => {
            let body = json!({ "text": read_input(&input)?, "mode": mode.as_str() });
            let path = format!("/api/documents/{doc_id}/sitemap");
            api_request(base_url, reqwest::Method::POST, &path, Some(body)).await?
        }
        SitemapSubcommand::Count { doc_id } => {
            let path = format!("/api/documents/{doc_id}/sitemaps");
            api_request(base_url, reqwest::Method::GET, &path, None).await?
        }
    };
    print_json(&json)
}

async fn api_request(
    base_url: &str,
    method: reqwest::Method,
    path: &str,
    body: Option<Value>,
) -> Result<Value, CliError> {
    let client = reqwest::Client::new();
    let url = format!("{base_url}{path}");

    let request = client.request(method, &url);
    let request = if let Some(json) = body {
        request.json(&json)
    } else {
        request
    };

    let response = request.send().await?;
    let status = response.status();
    let value = response
        .json::<Value>()
        .await
        .unwrap_or_else(|_| Value::Null);

    if !status.is_success() {
        let message = value
            .get("error")
            .and_then(Value::as_str)
            .map_or_else(|| value.to_string(), ToOwned::to_owned);
        return Err(CliError::ServerError { status: status.as_u16(), message });
    }

    Ok(value)
}

fn read_input(path: &str) -> Result<String, CliError> {
    let result = if path == "-" {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text).map(|_| text)
    } else {
        fs::read_to_string(path)
    };
    result.map_err(|source| CliError::Input { path: path.to_owned(), source })
}

/// Records, edges and positions for `text`, as one JSON document.
fn outline_report(text: &str, spacing: Spacing) -> Result<Value, CliError> {
    let records = parse(text);
    let edges = derive_edges(&records);
    let positions = layout_records(&records, spacing);
    Ok(json!({
        "records": serde_json::to_value(&records)?,
        "edges": serde_json::to_value(&edges)?,
        "positions": serde_json::to_value(&positions)?,
    }))
}

fn grid_report(text: &str, spec: &GridSpec) -> Result<Value, CliError> {
    let records = parse(text);
    let grid = pack_grid(records.len(), spec)?;
    let slots: Vec<Value> = records
        .iter()
        .zip(&grid.slots)
        .map(|(record, slot)| {
            json!({
                "name": record.name,
                "row": slot.row,
                "col": slot.col,
                "x": slot.x + spec.padding,
                "y": slot.y + spec.padding,
            })
        })
        .collect();
    Ok(json!({
        "slots": slots,
        "container": { "width": grid.container_width, "height": grid.container_height },
    }))
}

fn export_body(text: String, width: Option<f64>, height: Option<f64>) -> Value {
    let mut body = json!({ "text": text });
    if let Some(width) = width {
        body["frameWidth"] = json!(width);
    }
    if let Some(height) = height {
        body["frameHeight"] = json!(height);
    }
    body
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
