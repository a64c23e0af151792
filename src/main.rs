mod cli;
mod export;
mod render;
mod tree;
mod ui;

use std::fs;
use std::io::Read;

fn main() {
    env_logger::init();

    // Parse CLI arguments
    let args = cli::CliArgs::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        ui::print_error(&e);
        std::process::exit(1);
    }

    // Read the stored task result (file argument, or stdin when absent)
    let result_text = match read_input(&args) {
        Ok(text) => text,
        Err(e) => {
            ui::print_error(&format!("Failed to read input: {}", e));
            std::process::exit(1);
        }
    };

    // Normalize once; every artifact renders from this tree
    let tree = tree::ReportNode::from_result_text(&result_text);

    // Content-only mode prints the HTML fragment and writes nothing
    if args.content_only {
        let markdown = render::render_markdown(&tree, &args.title);
        println!("{}", render::markdown_to_fragment(&markdown));
        return;
    }

    let opts = args.to_export_options();
    let set = match export::generate_document_set(&tree, &args.title, &opts) {
        Ok(set) => set,
        Err(e) => {
            ui::print_error(&format!("Document generation failed: {}", e));
            std::process::exit(1);
        }
    };

    // Report the artifact paths
    if args.json {
        match serde_json::to_string_pretty(&set) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                ui::print_error(&format!("Failed to serialize path map: {}", e));
                std::process::exit(1);
            }
        }
    } else {
        for format in &opts.formats {
            if let Some(path) = set.path(*format) {
                ui::status(&format!("{} report saved to: {}", format.label(), path.display()));
            }
        }
    }

    // Exit 0 on full success, 2 on partial, 1 when nothing was produced
    let requested = opts.formats.len();
    let produced = set.produced();
    let exit_code = if produced == requested {
        0
    } else if produced > 0 {
        eprintln!("Warning: {} of {} formats failed", requested - produced, requested);
        2
    } else {
        ui::print_error("no artifacts could be generated");
        1
    };
    std::process::exit(exit_code);
}

/// Read the stored task result from the input file or stdin
fn read_input(args: &cli::CliArgs) -> std::io::Result<String> {
    match &args.input {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(text)
        }
    }
}
