use denoise_eval::image::io::save_grayscale_u8;
use denoise_eval::synthetic::standard_scenes;
use std::env;
use std::path::PathBuf;

const WIDTH: usize = 500;
const HEIGHT: usize = 500;

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1);
    let out_dir = PathBuf::from(args.next().ok_or_else(usage)?);
    let seed = match args.next() {
        Some(s) => s
            .parse::<u64>()
            .map_err(|e| format!("Invalid seed '{s}': {e}"))?,
        None => 42,
    };

    for (name, img) in standard_scenes(WIDTH, HEIGHT, seed) {
        let path = out_dir.join(format!("{name}.png"));
        save_grayscale_u8(&img, &path)?;
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn usage() -> String {
    "Usage: generate_test_images <out_dir> [seed]".to_string()
}
