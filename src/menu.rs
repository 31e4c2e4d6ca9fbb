//! Interactive menu

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use anyhow::bail;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum MenuChoice {
    Regenerate,
    TogglePath,
    RotateColors,
    Quit,
}

impl FromStr for MenuChoice {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim() {
            "1" => Ok(MenuChoice::Regenerate),
            "2" => Ok(MenuChoice::TogglePath),
            "3" => Ok(MenuChoice::RotateColors),
            "4" => Ok(MenuChoice::Quit),
            other => bail!("Invalid choice `{}`", other),
        }
    }
}

const MENU: &str = "
=== A-Maze-ing ===
1. Re-generate a new maze
2. Show/Hide path from entry to exit
3. Rotate maze colors
4. Quit
";

/// Print the menu and read choices until a valid one is entered
///
/// Returns `None` when the input is exhausted.
pub fn prompt(input: &mut impl BufRead, output: &mut impl Write) -> io::Result<Option<MenuChoice>> {
    write!(output, "{}", MENU)?;
    let mut line = String::new();
    loop {
        write!(output, "Choice? (1-4): ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        match line.parse() {
            Ok(choice) => return Ok(Some(choice)),
            Err(_) => writeln!(output, "Invalid choice. Please enter 1, 2, 3, or 4.")?,
        }
    }
}
