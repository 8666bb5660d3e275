//! Print a summary of every take in one or more JSON take files.
//!
//! Usage:
//!   cargo run --bin take_info -- [--joint <NAME>] <FILE>...

use std::env;
use std::path::PathBuf;

use armature::animation::{AnimationLoader, JsonTakeLoader, Take};
use armature::core::logging;

fn print_help() {
    eprintln!("take_info - Summarize JSON animation takes");
    eprintln!();
    eprintln!("Usage: take_info [OPTIONS] <FILE>...");
    eprintln!();
    eprintln!("Options:");
    eprintln!("    -j, --joint <NAME>      Also print the samples of one joint");
    eprintln!("    -h, --help              Show this help message");
}

#[derive(Debug)]
struct Args {
    files: Vec<PathBuf>,
    joint: Option<String>,
}

fn parse_args() -> Result<Args, String> {
    let mut files = Vec::new();
    let mut joint = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Err("show_help".to_string()),
            "-j" | "--joint" => {
                joint = Some(args.next().ok_or("Missing value for --joint")?);
            }
            flag if flag.starts_with('-') => return Err(format!("Unknown option: {flag}")),
            _ => files.push(PathBuf::from(arg)),
        }
    }

    if files.is_empty() {
        return Err("Missing take file".to_string());
    }
    Ok(Args { files, joint })
}

fn print_take(take: &Take, joint: Option<&str>) {
    println!(
        "  {:<24} {:>8.3}s {:>6} frames {:>4} joints {:>6} keys",
        take.name(),
        take.duration(),
        take.num_frames(),
        take.keyframes().len(),
        take.sample_count()
    );

    let Some(name) = joint else {
        return;
    };
    match take.keyframe(name) {
        Some(keyframe) => {
            for (frame, sample) in keyframe.samples() {
                println!(
                    "      frame {:>7.2}  t {:?}  r {:?}  s {:?}",
                    frame,
                    sample.translation.to_array(),
                    sample.rotation.to_array(),
                    sample.scale.to_array()
                );
            }
        }
        None => println!("      joint {name:?} is not animated"),
    }
}

fn main() {
    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            if e == "show_help" {
                print_help();
                return;
            }
            eprintln!("Error: {}", e);
            print_help();
            std::process::exit(1);
        }
    };

    logging::init();

    let loader = JsonTakeLoader::new();
    let mut failures = 0;
    for path in &args.files {
        match loader.load_animations(path) {
            Ok(takes) => {
                println!("{} ({} takes)", path.display(), takes.len());
                for take in &takes {
                    print_take(take, args.joint.as_deref());
                }
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", path.display(), e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        std::process::exit(1);
    }
}
