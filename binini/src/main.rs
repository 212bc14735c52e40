//! INI command-line tool for validating and transcoding INI documents.
//!
//! Usage: ini [OPTIONS] [FILE|DIR]
//!
//! Options:
//!   -t, --to <FORMAT>      Output format (yaml, toml, cbor) [default: yaml]
//!   -w, --write            Write output to file with inferred name
//!   -o, --output <FILE>    Write output to specified file
//!   --check                Check if file is valid (exit 0 if valid, 1 if invalid)
//!   -h, --help             Print help
//!   -V, --version          Print version

use libini::Reader;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::Path;
use std::process;

mod transcode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Toml,
    Cbor,
}

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut to_format: Option<&str> = None;
    let mut write_back = false;
    let mut output_file: Option<&str> = None;
    let mut check_only = false;
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("ini {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-t" | "--to" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: -t requires a format argument");
                    process::exit(1);
                }
                to_format = Some(&args[i]);
            }
            "-w" | "--write" => {
                write_back = true;
            }
            "-o" | "--output" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --output requires an argument");
                    process::exit(1);
                }
                output_file = Some(&args[i]);
            }
            "--check" => {
                check_only = true;
            }
            "-" => {
                // Explicit stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    if write_back && output_file.is_some() {
        eprintln!("Error: --write and --output are mutually exclusive");
        process::exit(1);
    }

    let output_format = match parse_format(to_format.unwrap_or("yaml")) {
        Some(format) => format,
        None => {
            eprintln!("Error: Unknown format: {}", to_format.unwrap_or_default());
            process::exit(1);
        }
    };

    let Some(path) = input_path else {
        let stdin = io::stdin();
        let exit_code = process_input(
            stdin.lock(),
            None,
            output_format,
            output_file,
            write_back,
            check_only,
        );
        process::exit(exit_code);
    };

    if Path::new(path).is_dir() {
        if output_file.is_some() {
            eprintln!("Error: --output cannot be used with directory input");
            process::exit(1);
        }
        process_directory(path, output_format, write_back, check_only);
        return;
    }

    let exit_code = process_file(path, output_format, output_file, write_back, check_only);
    process::exit(exit_code);
}

fn parse_format(s: &str) -> Option<Format> {
    match s {
        "yaml" | "yml" => Some(Format::Yaml),
        "toml" => Some(Format::Toml),
        "cbor" => Some(Format::Cbor),
        _ => None,
    }
}

fn format_extension(format: Format) -> &'static str {
    match format {
        Format::Yaml => "yaml",
        Format::Toml => "toml",
        Format::Cbor => "cbor",
    }
}

fn process_directory(dir_path: &str, output_format: Format, write_back: bool, check_only: bool) {
    let entries = match fs::read_dir(dir_path) {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Error reading directory {}: {}", dir_path, e);
            process::exit(1);
        }
    };

    let mut paths: Vec<_> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.extension().map(|e| e == "ini").unwrap_or(false))
        .collect();
    paths.sort();

    let mut had_errors = false;
    for path in paths {
        let path_str = path.to_string_lossy();
        if process_file(&path_str, output_format, None, write_back, check_only) != 0 {
            had_errors = true;
        }
    }

    process::exit(if had_errors { 1 } else { 0 });
}

/// Open `path` and stream it through the reader. The file is closed when
/// this returns.
fn process_file(
    path: &str,
    output_format: Format,
    output_file: Option<&str>,
    write_back: bool,
    check_only: bool,
) -> i32 {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Error reading {}: {}", path, e);
            return 1;
        }
    };
    process_input(
        &mut file,
        Some(path),
        output_format,
        output_file,
        write_back,
        check_only,
    )
}

fn process_input<R: Read>(
    input: R,
    input_file: Option<&str>,
    output_format: Format,
    output_file: Option<&str>,
    write_back: bool,
    check_only: bool,
) -> i32 {
    let filename = input_file.map(|p| {
        Path::new(p)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| p.to_string())
    });

    let sections = match Reader::with_filename(input, filename.as_deref()).read_all() {
        Ok(sections) => sections,
        Err(e) => {
            if let Some(path) = input_file {
                eprintln!("{}: {}", path, e);
            } else {
                eprintln!("Parse error: {}", e);
            }
            return 1;
        }
    };

    if check_only {
        if let Some(path) = input_file {
            println!("{}: ok", path);
        }
        return 0;
    }

    match output_format {
        Format::Yaml => match transcode::yaml::encode(&sections) {
            Ok(output) => {
                write_text_output(&output, output_file, write_back, input_file, output_format);
            }
            Err(e) => {
                eprintln!("Error: Cannot convert to YAML: {}", e);
                return 1;
            }
        },
        Format::Toml => match transcode::toml::encode(&sections) {
            Ok(output) => {
                write_text_output(&output, output_file, write_back, input_file, output_format);
            }
            Err(e) => {
                eprintln!("Error: Cannot convert to TOML: {}", e);
                return 1;
            }
        },
        Format::Cbor => match transcode::cbor::encode(&sections) {
            Ok(bytes) => {
                write_binary_output(&bytes, output_file, write_back, input_file, output_format);
            }
            Err(e) => {
                eprintln!("Error: Cannot convert to CBOR: {}", e);
                return 1;
            }
        },
    }

    0
}

fn write_text_output(
    output: &str,
    output_file: Option<&str>,
    write_back: bool,
    input_file: Option<&str>,
    format: Format,
) {
    if output_file.is_some() || write_back {
        write_output_file(output.as_bytes(), output_file, input_file, format);
    } else {
        print!("{}", output);
        // Ensure output ends with newline
        if !output.ends_with('\n') {
            println!();
        }
    }
}

fn write_binary_output(
    output: &[u8],
    output_file: Option<&str>,
    write_back: bool,
    input_file: Option<&str>,
    format: Format,
) {
    if output_file.is_some() || write_back {
        write_output_file(output, output_file, input_file, format);
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if let Err(e) = handle.write_all(output) {
            eprintln!("Error writing to stdout: {}", e);
            process::exit(1);
        }
    }
}

/// Write to `-o <FILE>`, or next to the input with the format's extension.
fn write_output_file(
    output: &[u8],
    output_file: Option<&str>,
    input_file: Option<&str>,
    format: Format,
) {
    if let Some(path) = output_file {
        if let Err(e) = fs::write(path, output) {
            eprintln!("Error writing {}: {}", path, e);
            process::exit(1);
        }
    } else if let Some(input_path) = input_file {
        let output_path = Path::new(input_path).with_extension(format_extension(format));
        if let Err(e) = fs::write(&output_path, output) {
            eprintln!("Error writing {}: {}", output_path.display(), e);
            process::exit(1);
        }
    } else {
        eprintln!("Error: --write requires an input file");
        process::exit(1);
    }
}

fn print_help() {
    println!(
        "ini - INI command-line tool

USAGE:
    ini [OPTIONS] [FILE|DIR]

ARGS:
    [FILE|DIR]    Input file or directory (reads from stdin if not provided)
                  When a directory is given, processes all .ini files in it

OPTIONS:
    -t, --to <FORMAT>      Output format [default: yaml]
                           Supported: yaml, toml, cbor

    -w, --write            Write output to file with inferred extension

    -o, --output <FILE>    Write output to specified file (not valid with directory input)

    --check                Check if input is valid (exit 0 if valid, 1 if invalid)

    -h, --help             Print help

    -V, --version          Print version

EXAMPLES:
    # Show sections of an INI file as YAML
    ini settings.ini

    # Validate every INI file in a directory
    ini --check ./configs/

    # Convert INI to TOML
    ini -t toml settings.ini

    # Convert INI to CBOR (binary)
    ini -t cbor settings.ini -o settings.cbor

    # Convert all INI files in a directory to YAML files
    ini -w ./configs/
"
    );
}
