use clap::{Parser, Subcommand};
use folio::controller::analytics::Analytics;
use folio::controller::contact::{
    ContactFields, FormSubmitter, HttpTransport, SubmissionStatus, SubmitOutcome,
};
use folio::{config, content, generate, output};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Single-page academic portfolio generator")]
#[command(long_about = "\
Single-page academic portfolio generator

Builds one self-contained index.html with a light/dark theme toggle,
scroll-reveal sections and an AJAX contact form.

Content structure:

  content/
  ├── config.toml          # Colors, sections, contact endpoint (optional)
  ├── profile.toml         # Name, headline, links, \"now\" list
  ├── about.md             # About section body
  ├── publications.toml    # [[publication]] citation, doi, url
  ├── projects.toml        # [[project]] title, description, link, label
  ├── resume.pdf           # Linked from the top bar and hero
  └── assets/              # Copied to the output root

Run 'folio gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load content and write the site
    Build,
    /// Validate content directory without building
    Check,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Submit the contact form once from the command line
    Send {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        message: String,
        /// Override the configured form endpoint
        #[arg(long)]
        endpoint: Option<String>,
    },
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!("==> Loading {}", cli.source.display());
            let content = content::load(&cli.source)?;
            output::print_content_output(&content);

            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&content, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let content = content::load(&cli.source)?;
            output::print_content_output(&content);
            println!("==> Content is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Send {
            name,
            email,
            message,
            endpoint,
        } => {
            let site_config = config::load_config(&cli.source)?;
            let endpoint = endpoint.unwrap_or_else(|| site_config.contact.endpoint.clone());
            let submitter = FormSubmitter::new(
                endpoint,
                site_config.contact.hidden_fields(),
                HttpTransport::new()?,
                Analytics::tracing(),
            );
            submitter.set_fields(ContactFields::new(&name, &email, &message));

            println!("==> Sending to {}", submitter.endpoint());
            let runtime = tokio::runtime::Runtime::new()?;
            let state = match runtime.block_on(submitter.submit()) {
                SubmitOutcome::Completed(state) => state,
                SubmitOutcome::Ignored => submitter.state(),
            };
            println!("{}", output::format_submit_output(&state));
            if state.status == SubmissionStatus::Error {
                return Ok(ExitCode::FAILURE);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}
