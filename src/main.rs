use clap::Parser;
use std::path::Path;
use std::process::ExitCode;

const USAGE: &str = "Usage: pdf2docx <input_pdf> <output_docx>";

#[derive(Parser)]
#[command(
    name = "pdf2docx",
    about = "Convert PDF files to DOCX",
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Input PDF file
    #[arg(allow_hyphen_values = true)]
    input: String,
    /// Output DOCX file
    #[arg(allow_hyphen_values = true)]
    output: String,
}

/// Runs the full conversion and reports the outcome.
fn convert(pdf_path: &str, docx_path: &str) -> bool {
    match pdf2docx::convert_pdf_to_docx(Path::new(pdf_path), Path::new(docx_path)) {
        Ok(()) => {
            println!("✅ Conversion successful: {docx_path}");
            true
        }
        Err(e) => {
            eprintln!("❌ Conversion failed: {e}");
            false
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();

    // Exactly two arguments, counted before clap so `--` cannot change the arity.
    if std::env::args_os().count() != 3 {
        println!("{USAGE}");
        return ExitCode::FAILURE;
    }
    let Ok(args) = Args::try_parse() else {
        println!("{USAGE}");
        return ExitCode::FAILURE;
    };

    if convert(&args.input, &args.output) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
