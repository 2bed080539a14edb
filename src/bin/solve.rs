use std::time::Instant;

use vd_coloring::solver;

fn main() {
    env_logger::init();

    let mut shuffle = false;
    let mut save_to_file = false;
    let mut instance_path: Option<String> = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--shuffle" => shuffle = true,
            "--save" => save_to_file = true,
            other if !other.starts_with('-') && instance_path.is_none() => {
                instance_path = Some(other.to_string());
            }
            other => {
                eprintln!("Unexpected argument: {other}");
                eprintln!("Usage: solve <instance.json> [--shuffle] [--save]");
                std::process::exit(2);
            }
        }
    }

    let Some(instance_path) = instance_path else {
        eprintln!("Usage: solve <instance.json> [--shuffle] [--save]");
        std::process::exit(2);
    };

    let start = Instant::now();
    let solution = solver::solve(&instance_path, shuffle, save_to_file);
    println!(
        "{}: {} colors in {:.2?}",
        solution.instance,
        solution.num_colors,
        start.elapsed()
    );
}
