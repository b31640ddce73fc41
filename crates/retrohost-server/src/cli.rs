//! Command line subcommands and their text rendering

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use retrohost_library::{GameLibrary, player_url};
use std::fmt::Write;

#[derive(Parser, Debug)]
#[command(name = "retro-host")]
#[command(about = "RetroHost - Self-hosted retro gaming platform", long_about = None)]
#[command(after_help = "Environment variables:
  ROM_DIR           Directory containing ROM files (default: /roms)
  DATA_DIR          Directory for save data (default: /data)
  PORT              Server port (default: 8080)
  HOST_ADDR         External address for URLs (default: localhost:PORT)
  RETROHOST_CONFIG  Optional TOML file with the same settings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the web server (default)
    Serve,

    /// List all available ROMs
    List,

    /// Show cover art status for all ROMs
    Covers,

    /// Print URL to play a ROM
    Play {
        /// Part of a ROM name or filename
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

/// Column-aligned text table, two spaces between columns
struct Table {
    rows: Vec<Vec<String>>,
}

impl Table {
    fn new(headers: &[&str]) -> Self {
        let header = headers.iter().map(|h| h.to_string()).collect();
        let rule = headers.iter().map(|h| "-".repeat(h.len())).collect();
        Self {
            rows: vec![header, rule],
        }
    }

    fn row(&mut self, cells: Vec<String>) {
        self.rows.push(cells);
    }

    fn render(&self) -> String {
        let columns = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut widths = vec![0; columns];
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        let mut out = String::new();
        for row in &self.rows {
            let last = row.len().saturating_sub(1);
            for (i, cell) in row.iter().enumerate() {
                out.push_str(cell);
                if i < last {
                    let pad = widths[i] - cell.chars().count() + 2;
                    out.push_str(&" ".repeat(pad));
                }
            }
            out.push('\n');
        }
        out
    }
}

/// `list`: every ROM grouped by system, names sorted within a system
pub fn list(library: &GameLibrary) -> Result<String> {
    let catalog = library.catalog().context("Error scanning ROMs")?;

    if catalog.is_empty() {
        return Ok(format!(
            "No ROMs found in {}\n",
            library.rom_dir().display()
        ));
    }

    let mut table = Table::new(&["SYSTEM", "ROM", "FILE"]);
    for (system, roms) in catalog.by_system(library.registry()) {
        let mut roms = roms.to_vec();
        roms.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        for rom in roms {
            table.row(vec![system.name.clone(), rom.display_name, rom.file_name]);
        }
    }

    Ok(table.render())
}

/// `covers`: cover presence per ROM with a summary line
pub fn covers(library: &GameLibrary) -> Result<String> {
    let report = library.audit_covers().context("Error scanning ROMs")?;

    if report.statuses.is_empty() {
        return Ok(format!(
            "No ROMs found in {}\n",
            library.rom_dir().display()
        ));
    }

    let registry = library.registry();
    let mut table = Table::new(&["SYSTEM", "ROM", "COVER"]);
    for status in &report.statuses {
        let system = registry
            .by_id(&status.rom.system_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| status.rom.system_id.clone());
        let mark = if status.has_cover { "✓" } else { "✗ missing" };
        table.row(vec![system, status.rom.display_name.clone(), mark.to_string()]);
    }

    let mut out = table.render();
    write!(
        out,
        "\n{}/{} ROMs have covers",
        report.with_cover,
        report.total()
    )?;
    if report.missing > 0 {
        write!(out, " ({} missing)", report.missing)?;
    }
    writeln!(out)?;
    writeln!(
        out,
        "\nPlace cover images in: {}/covers/<system>/<rom-name>.{{png,jpg,webp}}",
        library.data_dir().display()
    )?;

    Ok(out)
}

/// `play`: resolve a query to one or more player URLs
pub fn play(library: &GameLibrary, host: &str, query: &str) -> Result<String> {
    let matches = library.search(query).context("Error scanning ROMs")?;
    let query = query.to_lowercase();

    if matches.is_empty() {
        bail!(
            "No ROM found matching '{}'\nUse 'retro-host list' to see available ROMs",
            query
        );
    }

    let registry = library.registry();
    let mut out = String::new();

    if let [rom] = matches.as_slice() {
        let system = registry
            .by_id(&rom.system_id)
            .context("ROM references an unknown system")?;
        writeln!(out, "Open this URL to play {}:\n", rom.display_name)?;
        writeln!(out, "  {}\n", player_url(host, rom, system))?;
        return Ok(out);
    }

    writeln!(out, "Multiple ROMs match '{}':\n", query)?;
    for rom in &matches {
        let system = registry
            .by_id(&rom.system_id)
            .context("ROM references an unknown system")?;
        writeln!(
            out,
            "  [{}] {}\n    {}\n",
            system.name,
            rom.display_name,
            player_url(host, rom, system)
        )?;
    }
    Ok(out)
}
