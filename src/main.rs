use arco::{config, create, deploy, generate, logging, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "arco")]
#[command(about = "Minimal static blog generator")]
#[command(long_about = "\
Minimal static blog generator

Every file in the content directory is one page. Its first two lines name
the page and the tag it is filed under; the rest is markdown:

  Title: Hello Rust
  Tag: tech
  ===============
  Body text in *markdown*.

Project layout:

  .
  ├── config.toml              # title, author, year, root, repo
  ├── md/                      # Content files
  │   └── hello-rust.md        # → output/tech/hello-rust.html
  ├── template/
  │   ├── page.html            # {title} {root} {content} {year} {author} [{tag} {site_url}]
  │   ├── index.html           # {title} {root} {content} {year} {author} [{site_url}]
  │   └── static/              # Copied to output/static/
  └── output/                  # Generated site, pushed by `arco deploy`

Run 'arco gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Project directory (holds config.toml)
    #[arg(long, default_value = ".", global = true)]
    project: PathBuf,

    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a content file with its header filled in
    #[command(visible_alias = "n")]
    New {
        /// Page title
        #[arg(short, long)]
        title: String,
        /// Tag the page is filed under
        #[arg(short = 'g', long)]
        tag: String,
        /// File name inside the content directory
        #[arg(short, long)]
        filename: String,
        /// Overwrite the file if it already exists
        #[arg(long)]
        force: bool,
    },
    /// Render every content file and the index into the output directory
    #[command(visible_alias = "g")]
    Generate,
    /// Commit the output directory and push it to the configured repo
    #[command(visible_alias = "d")]
    Deploy,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    match cli.command {
        Command::New {
            title,
            tag,
            filename,
            force,
        } => {
            let site_config = config::load_config(&cli.project)?;
            let page = create::NewPage {
                title: &title,
                tag: &tag,
                filename: &filename,
                force,
            };
            let path = create::create_page(&site_config, &cli.project, &page)?;
            output::print_new_page(&path, &cli.project, &title, &tag);
        }
        Command::Generate => {
            let site_config = config::load_config(&cli.project)?;
            let report = generate::generate(&site_config, &cli.project)?;
            output::print_generate_output(&report, &cli.project);
        }
        Command::Deploy => {
            let site_config = config::load_config(&cli.project)?;
            let output_dir = site_config.paths(&cli.project).output;
            let report = deploy::Deployer::new(&site_config).deploy(&output_dir)?;
            output::print_deploy_output(&report, &output_dir, &cli.project);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
