use bling::metrics::{available_fonts, GlyphRasterizer};
use bling::render::LIT_CELL;
use clap::Parser;

/// List the FIGlet fonts the sign can use, with a preview of each.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The text to preview every font with.
    #[clap(default_value = "BLING")]
    sample: String,

    /// Only print font names.
    #[clap(long)]
    names_only: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let fonts = available_fonts();
    println!("{} usable font(s)\n", fonts.len());

    for name in fonts {
        if cli.names_only {
            println!("{name}");
            continue;
        }
        let run = match GlyphRasterizer::new(&name) {
            Ok(rasterizer) => rasterizer.rasterize_natural(&cli.sample),
            Err(e) => {
                println!("=== {name}: {e}\n");
                continue;
            }
        };
        println!("=== {name} ({}x{} cells)", run.columns(), run.rows());
        for row in 0..run.rows() {
            let line: String =
                (0..run.columns()).map(|column| if run.is_lit(row, column) { LIT_CELL } else { ' ' }).collect();
            println!("{}", line.trim_end());
        }
        println!();
    }
    Ok(())
}
