//! Menu loop over generic line input and text output.

use chrono::{Local, TimeZone};
use jotter_core::{read_multiline, snippet, LoadError, Note, NoteId, NoteService, NoteStore};
use log::{error, info};
use std::io::{self, BufRead, Write};

const SNIPPET_CHARS: usize = 50;

/// One menu entry, selected by its number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    List,
    Add,
    Edit,
    Delete,
    Search,
    Exit,
}

impl MenuAction {
    pub fn parse(choice: &str) -> Option<Self> {
        match choice.trim() {
            "1" => Some(Self::List),
            "2" => Some(Self::Add),
            "3" => Some(Self::Edit),
            "4" => Some(Self::Delete),
            "5" => Some(Self::Search),
            "6" => Some(Self::Exit),
            _ => None,
        }
    }
}

/// Interactive session owning the store for its lifetime.
pub struct Session<R, W> {
    input: R,
    output: W,
    store: NoteStore,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, store: NoteStore) -> Self {
        Self {
            input,
            output,
            store,
        }
    }

    pub fn store(&self) -> &NoteStore {
        &self.store
    }

    pub fn into_store(self) -> NoteStore {
        self.store
    }

    /// Tells the user that startup data was discarded.
    pub fn report_load_error(&mut self, err: &LoadError) -> io::Result<()> {
        writeln!(
            self.output,
            "Failed to load notes ({err}); starting with an empty notebook."
        )
    }

    /// Runs the menu until exit or end of input, then saves.
    ///
    /// The save is attempted even when writing to the output failed.
    pub fn run(&mut self) -> io::Result<()> {
        let outcome = self.menu_loop();
        let reported = self.persist();
        outcome.and(reported)
    }

    fn menu_loop(&mut self) -> io::Result<()> {
        loop {
            self.render_menu()?;
            let Some(choice) = self.read_line()? else {
                info!("event=session_eof module=cli status=ok");
                return Ok(());
            };

            match MenuAction::parse(&choice) {
                Some(MenuAction::List) => self.show_all()?,
                Some(MenuAction::Add) => self.add_note()?,
                Some(MenuAction::Edit) => self.edit_note()?,
                Some(MenuAction::Delete) => self.delete_note()?,
                Some(MenuAction::Search) => self.search_notes()?,
                Some(MenuAction::Exit) => return Ok(()),
                None => writeln!(self.output, "Invalid choice.")?,
            }
            self.pause()?;
        }
    }

    fn persist(&mut self) -> io::Result<()> {
        match self.store.save() {
            Ok(()) => writeln!(self.output, "Notes saved."),
            Err(err) => {
                error!("event=session_save module=cli status=error");
                writeln!(self.output, "Failed to save notes: {err}")
            }
        }
    }

    fn render_menu(&mut self) -> io::Result<()> {
        writeln!(self.output)?;
        writeln!(self.output, "=== NOTES ===")?;
        writeln!(self.output, "1. Show all notes")?;
        writeln!(self.output, "2. Add a note")?;
        writeln!(self.output, "3. Edit a note")?;
        writeln!(self.output, "4. Delete a note")?;
        writeln!(self.output, "5. Search notes")?;
        writeln!(self.output, "6. Exit")?;
        write!(self.output, "Choose an action: ")?;
        self.output.flush()
    }

    fn show_all(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== ALL NOTES ===")?;
        self.write_list()
    }

    fn write_list(&mut self) -> io::Result<()> {
        let service = NoteService::new(&mut self.store);
        if service.is_empty() {
            return writeln!(self.output, "No notes.");
        }
        for (index, note) in service.list() {
            writeln!(
                self.output,
                "{index}. {} ({})",
                note.title,
                format_timestamp(note.created())
            )?;
            if let Some(modified) = note.modified() {
                writeln!(self.output, "   Modified: {}", format_timestamp(modified))?;
            }
        }
        Ok(())
    }

    fn add_note(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== NEW NOTE ===")?;
        let title = self.prompt("Title: ")?;
        writeln!(self.output, "Content (finish with an empty line):")?;
        let content = read_multiline(&mut self.input)?;

        NoteService::new(&mut self.store).add(title, content);
        writeln!(self.output, "Note added.")
    }

    fn edit_note(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== EDIT NOTE ===")?;
        if self.store.is_empty() {
            return writeln!(self.output, "No notes to edit.");
        }
        self.write_list()?;

        let Some((id, current)) = self.prompt_note("Note number to edit: ")? else {
            return writeln!(self.output, "Invalid note number.");
        };

        let title = self.prompt(&format!("Current title ({}): ", current.title))?;
        writeln!(self.output, "Current content:")?;
        writeln!(self.output, "{}", current.content)?;
        writeln!(
            self.output,
            "New content (finish with an empty line; an empty line right away keeps the current content):"
        )?;
        let content = read_multiline(&mut self.input)?;

        let mut service = NoteService::new(&mut self.store);
        let edited = service
            .index_of(id)
            .map(|index| service.edit(index, Some(&title), Some(&content)).is_ok())
            .unwrap_or(false);
        if edited {
            writeln!(self.output, "Note updated.")
        } else {
            writeln!(self.output, "Invalid note number.")
        }
    }

    fn delete_note(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== DELETE NOTE ===")?;
        if self.store.is_empty() {
            return writeln!(self.output, "No notes to delete.");
        }
        self.write_list()?;

        let answer = self.prompt("Note number to delete: ")?;
        let removed = parse_index(&answer)
            .map(|index| NoteService::new(&mut self.store).remove(index).is_ok())
            .unwrap_or(false);
        if removed {
            writeln!(self.output, "Note deleted.")
        } else {
            writeln!(self.output, "Invalid note number.")
        }
    }

    fn search_notes(&mut self) -> io::Result<()> {
        writeln!(self.output, "=== SEARCH NOTES ===")?;
        let query = self.prompt("Search text: ")?;
        writeln!(self.output, "Results:")?;

        let service = NoteService::new(&mut self.store);
        let mut found = false;
        for hit in service.search(&query) {
            found = true;
            writeln!(self.output, "{}. {}", hit.index, hit.note.title)?;
            writeln!(
                self.output,
                "   {}...",
                snippet(&hit.note.content, SNIPPET_CHARS)
            )?;
        }
        if !found {
            writeln!(self.output, "No notes found.")?;
        }
        Ok(())
    }

    /// Reads a note number and returns the note's key with a copy of it.
    fn prompt_note(&mut self, label: &str) -> io::Result<Option<(NoteId, Note)>> {
        let answer = self.prompt(label)?;
        let service = NoteService::new(&mut self.store);
        Ok(parse_index(&answer).and_then(|index| {
            service
                .resolve(index)
                .ok()
                .map(|(id, note)| (id, note.clone()))
        }))
    }

    fn pause(&mut self) -> io::Result<()> {
        self.prompt("\nPress Enter to continue...")?;
        Ok(())
    }

    /// Writes `label` and reads one line; end of input reads as empty.
    fn prompt(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        Ok(self.read_line()?.unwrap_or_default())
    }

    /// One line without its terminator, or `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }
}

fn parse_index(answer: &str) -> Option<usize> {
    answer.trim().parse().ok()
}

/// Local `dd.mm.yyyy HH:MM`, or raw milliseconds when out of range.
fn format_timestamp(epoch_millis: i64) -> String {
    match Local.timestamp_millis_opt(epoch_millis).earliest() {
        Some(time) => time.format("%d.%m.%Y %H:%M").to_string(),
        None => format!("{epoch_millis}ms"),
    }
}
