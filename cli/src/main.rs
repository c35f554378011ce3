//! resumedoc CLI - résumé text to PDF and DOCX

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use resumedoc::convert::output_filename;
use resumedoc::inspect::inspect_bytes;
use resumedoc::{
    BatchInput, ConvertOptions, JsonFormat, OutputFormat, ParseOptions, RenderOptions,
    ResumeConverter,
};

type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "resumedoc")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Render résumé text to PDF and DOCX", long_about = None)]
struct Cli {
    /// Input text file ("-" for stdin)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// JSON file with render options
    #[arg(long, global = true, value_name = "FILE", env = "RESUMEDOC_CONFIG")]
    config: Option<PathBuf>,

    /// Let every header line start a section, even on the first line
    #[arg(long, global = true)]
    always_split_headers: bool,

    /// Page size (overrides the config file)
    #[arg(long, global = true, value_enum)]
    page_size: Option<PageSizeArg>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render to both formats plus the JSON model
    Convert {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Render to PDF
    Pdf {
        /// Input text file, or a JSON model
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (derived from the input name if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Render to DOCX
    Docx {
        /// Input text file, or a JSON model
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (derived from the input name if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Dump the parsed document model as JSON
    Json {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print a plain-text preview in rendering order
    Text {
        /// Input text file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// List the elements of a rendered PDF or DOCX
    Inspect {
        /// Rendered document
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Print elements as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render many files in parallel
    Batch {
        /// Input text files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "pdf")]
        format: FormatArg,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        output: PathBuf,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// Paginated PDF
    Pdf,
    /// Word document
    Docx,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Pdf => OutputFormat::Pdf,
            FormatArg::Docx => OutputFormat::Docx,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum PageSizeArg {
    /// ISO A4
    A4,
    /// US Letter
    Letter,
}

impl From<PageSizeArg> for resumedoc::PageSize {
    fn from(size: PageSizeArg) -> Self {
        match size {
            PageSizeArg::A4 => resumedoc::PageSize::A4,
            PageSizeArg::Letter => resumedoc::PageSize::Letter,
        }
    }
}

/// Settings shared by every command.
struct Settings {
    config: Option<PathBuf>,
    always_split_headers: bool,
    page_size: Option<PageSizeArg>,
}

impl Settings {
    fn converter(&self) -> CliResult<ResumeConverter> {
        let mut render = match self.config {
            Some(ref path) => load_render_options(path)?,
            None => RenderOptions::default(),
        };
        if let Some(size) = self.page_size {
            render = render.with_page_size(size.into());
        }
        if render.generated_at.is_none() {
            render = render.with_generated_at(chrono::Utc::now());
        }

        let mut parse = ParseOptions::new();
        if self.always_split_headers {
            parse = parse.always_split();
        }

        let options = ConvertOptions::new()
            .with_parse_options(parse)
            .with_render_options(render);
        Ok(ResumeConverter::with_options(options)?)
    }
}

fn load_render_options(path: &Path) -> CliResult<RenderOptions> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
    let options = serde_json::from_str(&raw)
        .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?;
    log::debug!("loaded render options from {}", path.display());
    Ok(options)
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let settings = Settings {
        config: cli.config,
        always_split_headers: cli.always_split_headers,
        page_size: cli.page_size,
    };

    let result = match cli.command {
        Some(Commands::Convert { input, output }) => {
            cmd_convert(&settings, &input, output.as_deref())
        }
        Some(Commands::Pdf { input, output }) => {
            cmd_render(&settings, &input, output.as_deref(), OutputFormat::Pdf)
        }
        Some(Commands::Docx { input, output }) => {
            cmd_render(&settings, &input, output.as_deref(), OutputFormat::Docx)
        }
        Some(Commands::Json {
            input,
            output,
            compact,
        }) => cmd_json(&settings, &input, output.as_deref(), compact),
        Some(Commands::Text { input }) => cmd_text(&settings, &input),
        Some(Commands::Inspect { input, json }) => cmd_inspect(&input, json),
        Some(Commands::Batch {
            inputs,
            format,
            output,
        }) => cmd_batch(&settings, &inputs, format.into(), &output),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: convert if input is provided
            if let Some(input) = cli.input {
                cmd_convert(&settings, &input, cli.output.as_deref())
            } else {
                println!("{}", "Usage: resumedoc <FILE> [OUTPUT]".yellow());
                println!("       resumedoc --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn read_input(input: &Path) -> CliResult<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    fs::read_to_string(input).map_err(|e| format!("Cannot read {}: {}", input.display(), e).into())
}

fn input_name(input: &Path) -> String {
    input
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| n.as_str() != "-")
        .unwrap_or_default()
}

/// A `.json` input is a document model saved by `resumedoc json`.
fn is_model_file(input: &Path) -> bool {
    input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn cmd_convert(settings: &Settings, input: &Path, output: Option<&Path>) -> CliResult {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Parsing text...");
    let converter = settings.converter()?;
    let text = read_input(input)?;
    let name = input_name(input);
    let doc = converter.build_model(&text, &name);
    let json = resumedoc::render::to_json(&doc, JsonFormat::Pretty)?;
    fs::write(output_dir.join("model.json"), &json)?;
    pb.inc(1);

    pb.set_message("Rendering PDF...");
    let pdf = converter.pdf(&text, &name)?;
    fs::write(output_dir.join(&pdf.filename), &pdf.bytes)?;
    pb.inc(1);

    pb.set_message("Rendering DOCX...");
    let docx = converter.docx(&text, &name)?;
    fs::write(output_dir.join(&docx.filename), &docx.bytes)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!(
        "  {} {} ({} pages)",
        "├─".dimmed(),
        pdf.filename,
        pdf.stats.page_count.unwrap_or(0)
    );
    println!("  {} {}", "├─".dimmed(), docx.filename);
    println!("  {} model.json", "└─".dimmed());

    Ok(())
}

fn cmd_render(
    settings: &Settings,
    input: &Path,
    output: Option<&Path>,
    format: OutputFormat,
) -> CliResult {
    let converter = settings.converter()?;
    let text = read_input(input)?;
    let name = input_name(input);
    let generated = if is_model_file(input) {
        let doc = resumedoc::render::from_json(&text)?;
        converter.render_model(&doc, &name, format)?
    } else {
        converter.convert(&text, &name, format)?
    };

    let path = match output {
        Some(path) => path.to_path_buf(),
        None => input
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(&generated.filename),
    };
    fs::write(&path, &generated.bytes)?;

    println!(
        "{} {} ({} sections, {} bytes)",
        "Saved to".green(),
        path.display(),
        generated.stats.section_count,
        generated.len()
    );
    Ok(())
}

fn cmd_json(settings: &Settings, input: &Path, output: Option<&Path>, compact: bool) -> CliResult {
    let converter = settings.converter()?;
    let text = read_input(input)?;
    let doc = converter.build_model(&text, &input_name(input));

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = resumedoc::render::to_json(&doc, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_text(settings: &Settings, input: &Path) -> CliResult {
    let converter = settings.converter()?;
    let text = read_input(input)?;
    let doc = converter.build_model(&text, &input_name(input));
    let preview = resumedoc::render::to_text(&doc, converter.render_options())?;
    println!("{}", preview);
    Ok(())
}

fn cmd_inspect(input: &Path, json: bool) -> CliResult {
    let data = fs::read(input)?;
    let (format, elements) = inspect_bytes(&data)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&elements)?);
        return Ok(());
    }

    println!("{}", "Document Elements".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Format".bold(), format);
    println!("{}: {}", "Elements".bold(), elements.len());
    println!();

    for element in &elements {
        let label = format!("{:>9}", element.kind.to_string());
        let mut lines = element.text.lines();
        println!("{} {}", label.bold(), lines.next().unwrap_or_default());
        for line in lines {
            println!("{:>9} {}", "", line);
        }
    }

    Ok(())
}

fn cmd_batch(
    settings: &Settings,
    inputs: &[PathBuf],
    format: OutputFormat,
    output: &Path,
) -> CliResult {
    fs::create_dir_all(output)?;
    let converter = settings.converter()?;

    let mut batch = Vec::with_capacity(inputs.len());
    for input in inputs {
        batch.push(BatchInput::new(read_input(input)?, input_name(input)));
    }

    let pb = ProgressBar::new(batch.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );
    pb.set_message(format!("Rendering {}...", format));

    let results = converter.convert_batch(&batch, format);

    let mut failed = 0;
    for (input, result) in inputs.iter().zip(results) {
        match result {
            Ok(generated) => {
                fs::write(output.join(&generated.filename), &generated.bytes)?;
                pb.println(format!("{} {}", "✓".green(), generated.filename));
            }
            Err(e) => {
                failed += 1;
                let name = output_filename(&input_name(input), format);
                pb.println(format!("{} {}: {}", "✗".red(), name, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} rendered, {} failed",
        "Batch complete:".green().bold(),
        inputs.len() - failed,
        failed
    );

    if failed > 0 {
        return Err(format!("{} of {} inputs failed", failed, inputs.len()).into());
    }
    Ok(())
}

fn cmd_version() {
    println!("{} {}", "resumedoc".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Résumé text to PDF and DOCX");
    println!();
    let formats: Vec<String> = resumedoc::render::available_formats()
        .iter()
        .map(|f| f.to_string())
        .collect();
    println!("Backends: {}", formats.join(", "));
    println!("Repository: {}", "https://github.com/iyulab/resumedoc".dimmed());
    println!("License: MIT");
}
