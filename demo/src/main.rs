use clap::{Parser, Subcommand, ValueEnum};

use dungeon_forge::cave::CaveGenerator;
use dungeon_forge::complex::ComplexGenerator;
use dungeon_forge::rng::RandomSource;

#[derive(Parser)]
#[command(name = "dungeon-forge-demo")]
#[command(about = "Exercise dungeon_forge's generators from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    Sparse,
    Packed,
    Bsp,
    Cave,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a single dungeon grid and print it as ASCII
    Gen {
        shape: Shape,
        #[arg(short, long, default_value_t = 12345)]
        seed: u64,
        #[arg(short, long, default_value_t = 60)]
        width: i32,
        #[arg(short = 'H', long, default_value_t = 40)]
        height: i32,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Gen { shape, seed, width, height } => {
            let mut rng = RandomSource::with_seed(seed);
            let grid = match shape {
                Shape::Sparse => ComplexGenerator.generate_sparse(&mut rng, width, height, 6, 4, 10),
                Shape::Packed => ComplexGenerator.generate_packed(&mut rng, width, height, 10, 4, 7),
                Shape::Bsp => ComplexGenerator.generate_bsp(&mut rng, width, height, 5, 12),
                Shape::Cave => CaveGenerator.generate_open_cave(&mut rng, width, height, 5),
            };
            println!("{grid}");
            tracing::info!(seed, walkable = grid.count(|t| t.is_walkable()), "generated");
        }
    }
}
