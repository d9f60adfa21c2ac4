use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tracing::warn;

/// Asks the user for a line of text
pub trait Prompt {
    /// `None` when the user cancels
    fn prompt_string(&mut self, title: &str, message: &str) -> Option<String>;
}

/// Asks the user to choose a file
pub trait FilePicker {
    /// `None` when the user cancels
    fn pick_file(&mut self) -> Option<PathBuf>;
}

/// Prompts on stderr and reads the answer from stdin.
/// An empty answer or end of input cancels.
#[derive(Debug, Default)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn prompt_string(&mut self, title: &str, message: &str) -> Option<String> {
        let stdin = io::stdin();
        read_answer(&mut stdin.lock(), &mut io::stderr(), title, message)
    }
}

fn read_answer(
    input: &mut impl BufRead,
    output: &mut impl Write,
    title: &str,
    message: &str,
) -> Option<String> {
    // A prompt we cannot show is still answerable
    let _ = write!(output, "{}: {} ", title, message);
    let _ = output.flush();

    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => {
            let answer = line.trim();
            if answer.is_empty() {
                None
            } else {
                Some(answer.to_string())
            }
        }
        Err(e) => {
            warn!(error = %e, "could not read answer");
            None
        }
    }
}

/// Picks a file by asking for its path; only existing files are accepted
pub struct PromptFilePicker<P: Prompt> {
    prompt: P,
}

impl<P: Prompt> PromptFilePicker<P> {
    pub fn new(prompt: P) -> Self {
        PromptFilePicker { prompt }
    }
}

impl<P: Prompt> FilePicker for PromptFilePicker<P> {
    fn pick_file(&mut self) -> Option<PathBuf> {
        let answer = self.prompt.prompt_string("Add Attachment", "File path:")?;
        let path = PathBuf::from(answer);
        if path.is_file() {
            Some(path)
        } else {
            warn!(path = %path.display(), "not a file, attachment skipped");
            None
        }
    }
}

/// Replays canned answers; `None` entries act as a cancel
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<Option<String>>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn prompt_string(&mut self, _title: &str, _message: &str) -> Option<String> {
        self.answers.pop_front().flatten()
    }
}
