use std::{ collections::VecDeque, io::{ self, Stdout, Write }, time::Duration };

use crossterm::{
    cursor,
    event::{ self, Event, KeyCode, KeyEventKind, KeyModifiers },
    queue, execute,
    style::Print,
    terminal::{ self, Clear, ClearType, DisableLineWrap, EnableLineWrap, EnterAlternateScreen, LeaveAlternateScreen },
};

/// A fixed size grid of character cells. Row 0 is the top line.
pub trait GridSurface {
    /// (rows, cols)
    fn size(&self) -> (usize, usize);
    fn put_glyphs(&mut self, row: usize, col: usize, text: &str) -> io::Result<()>;
    fn clear_to_eol(&mut self, row: usize, col: usize) -> io::Result<()>;
    fn clear_all(&mut self) -> io::Result<()>;
    fn refresh(&mut self) -> io::Result<()>;
    /// Waits up to `timeout` for a keypress
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<char>>;
}

/// Real terminal via crossterm: raw mode on the alternate screen, restored on drop
pub struct TerminalSurface {
    out: Stdout,
    rows: usize,
    cols: usize,
    active: bool,
}

impl TerminalSurface {
    pub fn new() -> io::Result<TerminalSurface> {
        let mut out = io::stdout();
        execute!(out, EnterAlternateScreen, DisableLineWrap, cursor::Hide)?;
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;
        Ok(TerminalSurface { out, rows: rows as usize, cols: cols as usize, active: true })
    }

    /// Puts the terminal back the way we found it. Safe to call more than once.
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(())
        }
        self.active = false;
        terminal::disable_raw_mode()?;
        execute!(self.out, cursor::Show, EnableLineWrap, LeaveAlternateScreen)
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Restores the terminal without a handle, for the panic hook
pub fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let _ = execute!(io::stdout(), cursor::Show, EnableLineWrap, LeaveAlternateScreen);
}

impl GridSurface for TerminalSurface {
    fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn put_glyphs(&mut self, row: usize, col: usize, text: &str) -> io::Result<()> {
        if row >= self.rows || col >= self.cols {
            return Ok(())
        }
        let fits: String = text.chars().take(self.cols - col).collect();
        queue!(self.out, cursor::MoveTo(col as u16, row as u16), Print(fits))
    }

    fn clear_to_eol(&mut self, row: usize, col: usize) -> io::Result<()> {
        if row >= self.rows || col >= self.cols {
            return Ok(())
        }
        queue!(self.out, cursor::MoveTo(col as u16, row as u16), Clear(ClearType::UntilNewLine))
    }

    fn clear_all(&mut self) -> io::Result<()> {
        let (cols, rows) = terminal::size()?;
        self.rows = rows as usize;
        self.cols = cols as usize;
        queue!(self.out, Clear(ClearType::All))
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<char>> {
        if !event::poll(timeout)? {
            return Ok(None)
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Ok(Some('q')),
                KeyCode::Char(c) => Ok(Some(c)),
                _ => Ok(None),
            },
            Event::Resize(cols, rows) => {
                self.rows = rows as usize;
                self.cols = cols as usize;
                Ok(None)
            }
            _ => Ok(None),
        }
    }
}

/// An off-screen grid, used headless and in tests. Keys are fed in ahead of time.
#[derive(Debug, Clone)]
pub struct MemorySurface {
    rows: usize,
    cols: usize,
    cells: Vec<char>,
    keys: VecDeque<char>,
    refreshes: usize,
}

impl MemorySurface {
    pub fn new(rows: usize, cols: usize) -> Self {
        MemorySurface { rows, cols, cells: vec![' '; rows * cols], keys: VecDeque::new(), refreshes: 0 }
    }

    pub fn push_keys(&mut self, keys: &str) {
        self.keys.extend(keys.chars());
    }

    pub fn char_at(&self, row: usize, col: usize) -> char {
        self.cells[row * self.cols + col]
    }

    pub fn line(&self, row: usize) -> String {
        self.cells[row * self.cols..(row + 1) * self.cols].iter().collect()
    }

    /// Every non-blank cell as (row, col, char)
    pub fn glyphs(&self) -> Vec<(usize, usize, char)> {
        self.cells.iter().enumerate()
            .filter(|(_, c)| **c != ' ')
            .map(|(i, c)| (i / self.cols, i % self.cols, *c))
            .collect()
    }

    pub fn refreshes(&self) -> usize {
        self.refreshes
    }
}

impl GridSurface for MemorySurface {
    fn size(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    fn put_glyphs(&mut self, row: usize, col: usize, text: &str) -> io::Result<()> {
        if row >= self.rows {
            return Ok(())
        }
        for (i, c) in text.chars().enumerate() {
            if col + i >= self.cols {
                break
            }
            self.cells[row * self.cols + col + i] = c;
        }
        Ok(())
    }

    fn clear_to_eol(&mut self, row: usize, col: usize) -> io::Result<()> {
        if row >= self.rows || col >= self.cols {
            return Ok(())
        }
        for cell in &mut self.cells[row * self.cols + col..(row + 1) * self.cols] {
            *cell = ' ';
        }
        Ok(())
    }

    fn clear_all(&mut self) -> io::Result<()> {
        for cell in self.cells.iter_mut() {
            *cell = ' ';
        }
        Ok(())
    }

    fn refresh(&mut self) -> io::Result<()> {
        self.refreshes += 1;
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> io::Result<Option<char>> {
        Ok(self.keys.pop_front())
    }
}
