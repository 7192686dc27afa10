// SPDX-License-Identifier: MIT
//
// perdita: markup-driven terminal rendering, end to end.
//
// This binary wires the two crates together on a real terminal:
//
//   perdita-term   → tty guard, style/color state machine, key input
//   perdita-layout → full-screen frame, split panes, prompts
//
// Layout:
//
//   ┌─────────────────┤title├─────────────────┐
//   │ left pane          │ right pane          │
//   │ (style samples)    │ (layout notes)      │
//   │                                          │
//   │ Press any key to continue...             │
//   └──────────────────────────────────────────┘
//
// Logging is off unless PERDITA_LOG holds a filter (e.g. `debug`). Events go
// to PERDITA_LOG_FILE (default `perdita.log`), never to the screen.

use std::env;
use std::fs::File;
use std::io::Write;
use std::process;
use std::sync::Mutex;

use perdita_layout::{BorderGlyphs, Inset, LayoutError, Padding, Pane, PaneDetails};
use perdita_term::input::StdinKeys;
use perdita_term::tty::TtyGuard;
use perdita_term::{Terminal, TerminalConfig, Wrap};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage: perdita [options]

options:
  --title <markup>   title drawn on the frame border
  --border <n>       frame border width, 0 for none (default 1)
  --double           draw the frame with double lines
  --no-wrap          clip text at the right edge instead of wrapping
  -h, --help         show this help
";

// ─── Options ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct Options {
    title: String,
    border: u16,
    glyphs: BorderGlyphs,
    wrap: Wrap,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            title: String::from("|b>perdita|"),
            border: 1,
            glyphs: BorderGlyphs::LIGHT,
            wrap: Wrap::Allow,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Cli {
    Run(Options),
    Help,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> Result<Cli, String> {
    let mut opts = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Cli::Help),
            "--no-wrap" => opts.wrap = Wrap::Clip,
            "--double" => opts.glyphs = BorderGlyphs::DOUBLE,
            "--title" => opts.title = args.next().ok_or("--title needs a value")?,
            "--border" => {
                let value = args.next().ok_or("--border needs a value")?;
                opts.border = value
                    .parse()
                    .map_err(|_| format!("invalid border width '{value}'"))?;
            }
            other => return Err(format!("unknown argument '{other}'")),
        }
    }

    Ok(Cli::Run(opts))
}

// ─── Logging ────────────────────────────────────────────────────────────────

fn init_logging() {
    let Ok(filter) = env::var("PERDITA_LOG") else {
        return;
    };
    let path = env::var("PERDITA_LOG_FILE").unwrap_or_else(|_| String::from("perdita.log"));

    match File::create(&path) {
        Ok(file) => {
            if let Err(e) = install_logger(&filter, file) {
                eprintln!("perdita: cannot install logger: {e}");
            }
        }
        Err(e) => eprintln!("perdita: cannot open log file {path}: {e}"),
    }
}

/// Send `tracing` events matching `filter` to `file`. Fails if a global
/// subscriber is already set.
fn install_logger(
    filter: &str,
    file: File,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
}

// ─── Rendering ──────────────────────────────────────────────────────────────

const LEFT_LINES: &[&str] = &[
    "|b;fg[cyan]>Styles|",
    "",
    "|b>bold| |dim>dim| |i>italic| |u>underline|",
    "|s>strikethrough| |inverse> inverse |",
    "|fg[#ff8800]>orange| |bg[blue];fg[white]> white on blue |",
    "|fg[120,200,80]>r,g,b colors| pass through as given",
    "an escaped ~> stays literal",
];

/// Write `lines` top to bottom from the pane's padded start. Lines that do
/// not fit are dropped.
fn write_lines<W: Write>(
    pane: &mut Pane,
    term: &mut Terminal<W>,
    lines: &[&str],
) -> Result<(), LayoutError> {
    pane.move_to_start(term, Inset::Padded)?;
    for (i, line) in lines.iter().enumerate() {
        let step = if i == 0 {
            pane.write(term, line)
        } else {
            pane.write_on_newline(term, line)
        };
        match step {
            Ok(_) => {}
            Err(e) if e.is_out_of_bounds() => {
                tracing::debug!(dropped = lines.len() - i, "pane full");
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Draw the frame and both halves. Returns the frame for the footer prompt.
fn render<W: Write>(term: &mut Terminal<W>, opts: &Options) -> Result<Pane, LayoutError> {
    term.clear_screen()?;

    let mut frame = Pane::full_screen();
    frame
        .set_glyphs(opts.glyphs)
        .set_border_width(opts.border)
        .set_title(opts.title.as_str());
    if opts.border > 0 {
        frame.draw_border(term)?;
    }

    let mut halves = frame.split(&[PaneDetails::LEFT_HALF, PaneDetails::RIGHT_HALF]);
    for half in &mut halves {
        half.set_padding(Padding::new(0, 1, 1, 1));
    }

    let size = term.size();
    let mode = match opts.wrap {
        Wrap::Allow => "wrapped",
        Wrap::Clip => "clipped",
    };
    let start = halves[1].start(size);
    let geometry = format!(
        "|fg[gray]>this pane: {}x{} at {},{}|",
        halves[1].width(size),
        halves[1].height(size),
        start.x,
        start.y,
    );
    let wrapping = format!("|fg[gray]>long lines are {mode}|");
    let right_lines = [
        "|b;fg[magenta]>Layout|",
        "",
        "Each half is computed from the frame's",
        "padded area on every access, so the",
        "split follows the terminal as it resizes.",
        geometry.as_str(),
        wrapping.as_str(),
    ];

    write_lines(&mut halves[0], term, LEFT_LINES)?;
    write_lines(&mut halves[1], term, &right_lines)?;

    Ok(frame)
}

fn run(opts: &Options) -> Result<(), LayoutError> {
    let mut tty = TtyGuard::new();
    tty.enter()?;

    let config = TerminalConfig {
        wrap: opts.wrap,
        ..TerminalConfig::default()
    };
    let mut term = Terminal::stdout(config)?;
    tracing::debug!(size = ?term.size(), "rendering");

    let mut frame = render(&mut term, opts)?;
    frame.move_to_bottom_left(&mut term, Inset::Padded)?;
    frame.press_any_key(&mut term, &mut StdinKeys::new(), None)?;

    term.clear_screen()?;
    term.restore()?;
    tty.leave()?;
    Ok(())
}

fn main() {
    let opts = match parse_args(env::args().skip(1)) {
        Ok(Cli::Run(opts)) => opts,
        Ok(Cli::Help) => {
            print!("{USAGE}");
            return;
        }
        Err(msg) => {
            eprintln!("perdita: {msg}\n\n{USAGE}");
            process::exit(2);
        }
    };

    init_logging();

    if let Err(e) = run(&opts) {
        eprintln!("perdita: {e}");
        process::exit(1);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use perdita_term::Size;

    fn args(list: &[&str]) -> Result<Cli, String> {
        parse_args(list.iter().map(|s| (*s).to_owned()))
    }

    #[test]
    fn no_args_gives_defaults() {
        assert_eq!(args(&[]).unwrap(), Cli::Run(Options::default()));
    }

    #[test]
    fn flags_are_applied() {
        let Cli::Run(opts) = args(&["--title", "Notes", "--border", "2", "--no-wrap", "--double"])
            .unwrap()
        else {
            panic!("expected Run");
        };
        assert_eq!(opts.title, "Notes");
        assert_eq!(opts.border, 2);
        assert_eq!(opts.wrap, Wrap::Clip);
        assert_eq!(opts.glyphs, BorderGlyphs::DOUBLE);
    }

    #[test]
    fn help_wins() {
        assert_eq!(args(&["--border", "1", "--help"]).unwrap(), Cli::Help);
        assert_eq!(args(&["-h"]).unwrap(), Cli::Help);
    }

    #[test]
    fn bad_arguments_are_reported() {
        assert!(args(&["--border"]).unwrap_err().contains("needs a value"));
        assert!(args(&["--border", "x"]).unwrap_err().contains("'x'"));
        assert!(args(&["--frobnicate"]).unwrap_err().contains("--frobnicate"));
    }

    #[test]
    fn second_logger_is_refused() {
        let path = env::temp_dir().join(format!("perdita-test-{}.log", process::id()));
        let _ = install_logger("debug", File::create(&path).unwrap());
        let again = install_logger("debug", File::create(&path).unwrap());
        assert!(again.is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn sample_markup_parses() {
        for line in LEFT_LINES {
            perdita_term::markup::parse(line).unwrap();
        }
    }

    #[test]
    fn render_into_buffer() {
        let mut term = Terminal::new(Vec::new(), Size::new(100, 30)).unwrap();
        render(&mut term, &Options::default()).unwrap();
        let out = String::from_utf8(term.into_inner()).unwrap();
        assert!(out.contains('┌'));
        assert!(out.contains("Styles"));
        assert!(out.contains("Layout"));
        assert!(out.contains("an escaped > stays literal"));
    }

    #[test]
    fn render_survives_tiny_terminal() {
        let mut term = Terminal::new(Vec::new(), Size::new(10, 4)).unwrap();
        render(&mut term, &Options::default()).unwrap();
    }
}
