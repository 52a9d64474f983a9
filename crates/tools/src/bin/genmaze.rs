use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use trek_core::{Grid, MazeGenerator, Pos, Rules, plan_cheapest_route};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1)]
    level: u32,
    /// Overlay the planner's reference route
    #[arg(long)]
    route: bool,
    /// Optional TOML file overriding the default game rules
    #[arg(short, long)]
    rules: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let rules = match &args.rules {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read rules file: {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse rules file: {}", path.display()))?
        }
        None => Rules::default(),
    };

    let maze = MazeGenerator::new(args.seed, &rules)
        .generate(args.level)
        .map_err(|error| anyhow::anyhow!("maze generation failed: {error:?}"))?;
    log::info!("seed {} level {} accepted on attempt {}", args.seed, args.level, maze.attempt);

    let grid = Grid::from_generated(&maze);
    let route = if args.route {
        plan_cheapest_route(&grid, grid.start, rules.min_tolls_to_cross)
    } else {
        None
    };

    for y in 0..maze.size as i32 {
        let mut line = String::new();
        for x in 0..maze.size as i32 {
            let pos = Pos { y, x };
            let glyph = if pos == grid.start {
                'S'
            } else if pos == grid.goal {
                'G'
            } else if maze.wall_at(pos) {
                '#'
            } else if grid.booth_at(pos).is_some() {
                '$'
            } else if route.as_ref().is_some_and(|route| route.steps.contains(&pos)) {
                '*'
            } else {
                '.'
            };
            line.push(glyph);
        }
        println!("{line}");
    }

    println!("booths: {}", grid.booths.len());
    if let Some(route) = route {
        println!(
            "route: {} steps, cost {}, tolls {}, constrained: {}",
            route.steps.len(),
            route.cost,
            route.tolls,
            route.constrained
        );
    }
    Ok(())
}
