use clap::{Parser, Subcommand, ValueEnum};
use log::info;
use printing_carousel_core::{
    CatalogLookup, Controls, Direction, Overlay, OverlayContent, OverlayOptions, PrintingCatalog,
    ProxySheet, fetch_printings, left, right,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "printing-carousel-cli")]
#[command(about = "Browse alternate printings for cards in a proxy sheet")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the images in a proxy sheet
    Sheet {
        /// Proxy sheet JSON file
        #[arg(short, long)]
        sheet: PathBuf,
    },
    /// Open the printing overlay on one sheet image and step through printings
    Browse {
        /// Proxy sheet JSON file
        #[arg(short, long)]
        sheet: PathBuf,
        /// Printing catalog JSON file
        #[arg(short, long)]
        catalog: PathBuf,
        /// Index of the clicked image in the sheet
        #[arg(short, long)]
        image: usize,
        /// Navigation steps, e.g. right,right,left
        #[arg(short, long, value_delimiter = ',')]
        moves: Vec<Move>,
        /// Use the printing shown after the last step
        #[arg(long = "use")]
        use_printing: bool,
        /// Where to write the updated sheet (default: overwrite --sheet)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Overlay options JSON file (default: user config directory)
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the circular neighbors of an index
    Neighbors {
        /// Number of printings
        #[arg(long)]
        count: usize,
        /// Index to look around
        #[arg(long)]
        index: usize,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Move {
    #[value(alias = "l")]
    Left,
    #[value(alias = "r")]
    Right,
}

impl From<Move> for Direction {
    fn from(m: Move) -> Self {
        match m {
            Move::Left => Direction::Left,
            Move::Right => Direction::Right,
        }
    }
}

fn print_overlay(overlay: &Overlay) {
    match overlay.content() {
        OverlayContent::Empty => println!("  (overlay closed)"),
        OverlayContent::Placeholder(placeholder) => {
            let faces = placeholder.faces.join(" | ");
            match placeholder.controls {
                // Greyed out until printings arrive
                Controls::Disabled => println!("  [←] {} [→]", faces),
                Controls::Absent => println!("  {}", faces),
            }
            for line in placeholder.status.lines() {
                println!("  {}", line);
            }
        }
        OverlayContent::Carousel(carousel) => {
            let entry = carousel.visible_entry();
            println!("  ← {} →", entry.faces().join(" | "));
            for line in entry.status_text(carousel.len()).lines() {
                println!("  {}", line);
            }
            println!("  {}", entry.printing.reference_url);
            println!("  eager: {:?}", carousel.eager_indices());
        }
    }
    if let Some(alert) = overlay.alert() {
        println!("  ! {}", alert);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sheet { sheet } => {
            let sheet = ProxySheet::load(&sheet)?;
            println!("{} images:", sheet.len());
            for (i, image) in sheet.images.iter().enumerate() {
                match &image.binding {
                    Some(card) if card.is_custom => {
                        println!("  {}. {} [custom]", i, image.source)
                    }
                    Some(card) => println!(
                        "  {}. {} - {} ({} face(s))",
                        i,
                        image.source,
                        card.name,
                        card.faces.len()
                    ),
                    None => println!("  {}. {} [not clickable]", i, image.source),
                }
            }
        }
        Commands::Browse {
            sheet: sheet_path,
            catalog,
            image,
            moves,
            use_printing,
            output,
            config,
        } => {
            let options = match config {
                Some(path) => OverlayOptions::load(&path)?,
                None => OverlayOptions::load_or_default()?,
            };
            let mut sheet = ProxySheet::load(&sheet_path)?;
            let lookup = CatalogLookup::new(PrintingCatalog::load(&catalog)?);
            let mut overlay = Overlay::new(options);

            let Some(card) = sheet.click(image) else {
                eprintln!("Image {} is not a clickable card face", image);
                std::process::exit(1);
            };

            println!("Opening printings for '{}'...", card.name);
            let request = overlay.open(card);
            print_overlay(&overlay);

            if let Some(request) = request {
                let response = fetch_printings(&lookup, request).await;
                overlay.apply_lookup(response);
                print_overlay(&overlay);
            }

            for step in moves {
                let direction = Direction::from(step);
                if overlay.navigate(direction, &mut sheet).is_none() {
                    println!("Nothing to navigate");
                    break;
                }
                println!("{:?}:", direction);
                print_overlay(&overlay);
            }

            if use_printing {
                let label = overlay
                    .carousel()
                    .map(|carousel| carousel.visible_entry().printing_label());
                let rewritten = overlay.use_printing(&mut sheet);
                match label {
                    Some(label) => println!("Using {} ({} image(s) changed)", label, rewritten),
                    None => println!("No printing to use"),
                }
                print_overlay(&overlay);
            }

            let output = output.unwrap_or(sheet_path);
            sheet.save(&output)?;
            info!("Sheet written to {}", output.display());
            println!("Sheet saved to: {}", output.display());
        }
        Commands::Neighbors { count, index } => {
            if count == 0 || index >= count {
                eprintln!("Index must be below a non-zero count");
                std::process::exit(1);
            }
            println!("left: {}  right: {}", left(index, count), right(index, count));
        }
    }

    Ok(())
}
