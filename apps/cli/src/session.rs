use crate::concepts::CREATIVE_CONCEPTS;
use anyhow::Result;
use chrono::Local;
use generation::AspectRatio;
use history::HistoryEntry;
use std::fs;
use std::io::{self, BufRead, Write};
use std::time::Duration;
use studio::{CallKind, Step, StudioController, WorkflowError};
use tracing::warn;

/// How long the session waits for a single generation call before telling
/// the user it is still running.
const CALL_TIMEOUT: Duration = Duration::from_secs(180);

pub struct Session {
    controller: StudioController,
}

impl Session {
    pub fn new(controller: StudioController) -> Self {
        Self { controller }
    }

    pub fn run(&mut self) -> Result<()> {
        println!("AI CGI Ad Studio - type 'help' for commands.");
        let stdin = io::stdin();
        loop {
            // Apply any generation result that landed after a wait timed out.
            self.controller.pump();
            self.prompt()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let (verb, rest) = match line.split_once(char::is_whitespace) {
                Some((verb, rest)) => (verb, rest.trim()),
                None => (line, ""),
            };
            match verb {
                "quit" | "exit" => break,
                "help" => print_help(),
                "status" => self.print_status(),
                "upload" => self.upload(rest),
                "prepare" => self.generate(|c| c.begin_prepare()),
                "next" => report(self.controller.advance_to_design()),
                "scene" => report(self.controller.set_scene(rest)),
                "concepts" => print_concepts(),
                "concept" => self.pick_concept(rest),
                "random" => self.generate(|c| c.begin_random_scene()),
                "ratios" => print_ratios(),
                "design" => self.design(rest),
                "video" => self.generate(|c| c.begin_video_prompt()),
                "save" => self.save(rest),
                "redesign" => report(self.controller.redesign_from_prepared()),
                "iterate" => report(self.controller.redesign_from_final()),
                "restart" => {
                    self.controller.start_over();
                    println!("Starting over.");
                }
                "history" => self.print_history(),
                "show" => self.show_history_item(rest),
                "clear-history" => self.clear_history()?,
                other => println!("Unknown command '{other}'; type 'help'."),
            }
        }
        Ok(())
    }

    fn prompt(&self) -> Result<()> {
        let step = match self.controller.state().step {
            Step::Prepare => "prepare",
            Step::Design => "design",
            Step::Finalize => "finalize",
        };
        print!("[{step}] > ");
        io::stdout().flush()?;
        Ok(())
    }

    fn upload(&mut self, path: &str) {
        if path.is_empty() {
            println!("Usage: upload <image file>");
            return;
        }
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(err) => {
                println!("Could not read {path}: {err}");
                return;
            }
        };
        match self.controller.upload(bytes) {
            Ok(()) => println!(
                "Uploaded. If the product is already background-free you can go straight to 'next'."
            ),
            Err(err) => println!("{err}"),
        }
    }

    fn generate(&mut self, begin: impl FnOnce(&mut StudioController) -> Result<(), WorkflowError>) {
        if let Err(err) = begin(&mut self.controller) {
            println!("{err}");
            return;
        }
        let message = match self.controller.pending_call() {
            Some(CallKind::Prepare) => "Preparing product...",
            Some(CallKind::Design) => "Designing CGI Ad...",
            Some(CallKind::VideoPrompt) => "Writing video prompt...",
            Some(CallKind::RandomScene) => "Brainstorming ideas...",
            None => return,
        };
        println!("{message}");
        if !self.controller.wait_idle(CALL_TIMEOUT) {
            warn!("generation call still running after {CALL_TIMEOUT:?}");
            println!("Still working; the result will be applied when it arrives.");
            return;
        }
        if let Some(error) = &self.controller.state().last_error {
            println!("Error: {error}");
        } else {
            self.print_outcome();
        }
    }

    fn print_outcome(&self) {
        let state = self.controller.state();
        match state.step {
            Step::Prepare => println!("Product prepared."),
            Step::Design => {
                if !state.scene.is_empty() {
                    println!("Scene: {}", state.scene);
                }
            }
            Step::Finalize => match &state.video_prompt {
                Some(prompt) => println!("Video prompt:\n{prompt}"),
                None => println!(
                    "Your CGI ad is ready. 'save <path>' to export it, 'video' for an animation prompt."
                ),
            },
        }
    }

    fn design(&mut self, ratio: &str) {
        let aspect = if ratio.is_empty() {
            AspectRatio::Square
        } else {
            match ratio.parse::<AspectRatio>() {
                Ok(aspect) => aspect,
                Err(err) => {
                    println!("{err}; see 'ratios'.");
                    return;
                }
            }
        };
        self.generate(|c| c.begin_design(aspect));
    }

    fn pick_concept(&mut self, index: &str) {
        let Ok(index) = index.parse::<usize>() else {
            println!("Usage: concept <number> (see 'concepts')");
            return;
        };
        let Some(concept) = index.checked_sub(1).and_then(|i| CREATIVE_CONCEPTS.get(i)) else {
            println!("No concept {index}; see 'concepts'.");
            return;
        };
        match self.controller.set_scene(concept.description) {
            Ok(()) => println!("Scene set from \"{}\".", concept.title),
            Err(err) => println!("{err}"),
        }
    }

    fn save(&mut self, path: &str) {
        if path.is_empty() {
            println!("Usage: save <output file>");
            return;
        }
        let Some(final_ad) = &self.controller.state().final_ad else {
            println!("Nothing to save yet; generate an ad first.");
            return;
        };
        match fs::write(path, final_ad.artifact.bytes()) {
            Ok(()) => println!("Saved ad to {path}."),
            Err(err) => println!("Could not write {path}: {err}"),
        }
    }

    fn print_status(&self) {
        let state = self.controller.state();
        println!("Step: {:?}", state.step);
        println!("Uploaded: {}", state.original.is_some());
        println!("Prepared: {}", state.has_prepared);
        if !state.scene.is_empty() {
            println!("Scene: {}", state.scene);
        }
        if let Some(error) = &state.last_error {
            println!("Last error: {error}");
        }
    }

    fn print_history(&self) {
        let entries = self.controller.history();
        if entries.is_empty() {
            println!("No ads in history yet.");
            return;
        }
        for (index, entry) in entries.iter().enumerate() {
            println!(
                "{:>3}. {}  {}",
                index + 1,
                entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
                truncate(&entry.scene_description, 60)
            );
        }
    }

    fn show_history_item(&self, selector: &str) {
        let entries = self.controller.history();
        let entry = selector
            .parse::<usize>()
            .ok()
            .and_then(|index| index.checked_sub(1))
            .and_then(|index| entries.get(index))
            .or_else(|| self.controller.select_history_item(selector));
        match entry {
            Some(entry) => print_entry(entry),
            None => println!("No history entry '{selector}'."),
        }
    }

    fn clear_history(&mut self) -> Result<()> {
        print!("Are you sure you want to delete all your project history? This action cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if answer.trim().eq_ignore_ascii_case("y") {
            if let Err(err) = self.controller.clear_history() {
                println!("{err}");
            } else {
                println!("History cleared.");
            }
        } else {
            println!("Kept history.");
        }
        Ok(())
    }
}

fn report(result: Result<(), WorkflowError>) {
    if let Err(err) = result {
        println!("{err}");
    }
}

fn print_entry(entry: &HistoryEntry) {
    println!("Id: {}", entry.id);
    println!(
        "Created: {}",
        entry.timestamp.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
    );
    println!("Scene: {}", entry.scene_description);
    if entry.video_prompt.is_empty() {
        println!("Video prompt: not generated.");
    } else {
        println!("Video prompt: {}", entry.video_prompt);
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}

fn print_help() {
    println!("Commands:");
    println!("  upload <file>    load a product photo (PNG, JPG, WEBP)");
    println!("  prepare          remove the background from the upload");
    println!("  next             continue to the design step");
    println!("  scene <text>     describe the scene for the ad");
    println!("  concepts         list preset scene concepts");
    println!("  concept <n>      use a preset concept as the scene");
    println!("  random           let the studio suggest a scene");
    println!("  ratios           list the available ad dimensions");
    println!("  design [ratio]   generate the ad (default 1:1)");
    println!("  video            generate a text-to-video prompt for the ad");
    println!("  save <file>      export the generated ad");
    println!("  redesign         back to design with the same product");
    println!("  iterate          back to design using the ad as the product");
    println!("  restart          wipe the session and start over");
    println!("  history          list past generations");
    println!("  show <n|id>      show one past generation in full");
    println!("  clear-history    delete all past generations");
    println!("  status, help, quit");
}

fn print_concepts() {
    for (index, concept) in CREATIVE_CONCEPTS.iter().enumerate() {
        println!("{:>3}. {} - {}", index + 1, concept.title, concept.description);
    }
}

fn print_ratios() {
    for ratio in AspectRatio::ALL {
        println!("  {:>5}  {}", ratio.as_str(), ratio.label());
    }
}
