//! Interactive Wizard Walk
//!
//! Asks every page of the current sequence in turn. The sequence is
//! re-derived before each question, so answering a branch page changes
//! which questions follow.

use crate::session::Session;
use crate::Console;
use anyhow::Result;
use dialoguer::{Confirm, Input, MultiSelect, Select};
use pagewise_core::{ModelCallbacks, Page, Screen, Value, WizardModel};
use std::cell::Cell;
use std::rc::Rc;

/// Remembers whether the page tree changed since it was last asked
#[derive(Default)]
struct TreeWatcher {
    changed: Cell<bool>,
}

impl TreeWatcher {
    fn take_changed(&self) -> bool {
        self.changed.replace(false)
    }
}

impl ModelCallbacks for TreeWatcher {
    fn on_page_data_changed(&self, _model: &WizardModel, page: &Page) {
        tracing::debug!("Answered '{}'", page.key());
    }

    fn on_page_tree_changed(&self, _model: &WizardModel) {
        self.changed.set(true);
    }
}

/// Walk the wizard until every required page is answered and the user confirms
pub fn run(session: &mut Session, console: &Console) -> Result<()> {
    let watcher = Rc::new(TreeWatcher::default());
    let listener = session.model.register_listener(&watcher);

    if let Some(ref description) = session.config.wizard.description {
        console.log(format!("{}\n", description));
    }

    let mut position = 0;
    loop {
        let sequence = session.model.current_page_sequence();

        let Some(page) = sequence.get(position).copied() else {
            match session.model.first_blocking_page() {
                Some(blocking) => {
                    console.warn(format!("'{}' still needs an answer", blocking.title()));
                    position = index_of(&session.model, blocking.key());
                    continue;
                }
                None => break,
            }
        };

        let key = page.key().to_string();
        let step = format!("[{}/{}]", position + 1, sequence.len());
        let answer = ask(page, &step)?;

        session.model.set_value(&key, answer)?;
        if watcher.take_changed() {
            console.verbose(format!(
                "Steps now: {}",
                session.model.current_page_sequence().len()
            ));
        }
        session.save()?;

        position += 1;
    }

    session.model.unregister_listener(listener);

    console.log("\nReview:");
    print_review(&session.model, console);

    let confirmed = Confirm::new()
        .with_prompt("Are these answers correct?")
        .default(true)
        .interact()?;

    if confirmed {
        console.success(format!("Answers saved to {}", session.state_path.display()));
    } else {
        console.log("Run 'pagewise run' again to change them.");
    }

    Ok(())
}

/// Print the review summary of the current sequence
pub fn print_review(model: &WizardModel, console: &Console) {
    for item in model.review_items() {
        let value = if item.display_value.is_empty() {
            "(none)"
        } else {
            item.display_value.as_str()
        };
        console.log(format!("  {:<24} {}", item.title, value));
        console.verbose(format!("key: {}", item.page_key));
    }
}

fn index_of(model: &WizardModel, key: &str) -> usize {
    model
        .current_page_sequence()
        .iter()
        .position(|page| page.key() == key)
        .unwrap_or(0)
}

fn ask(page: &Page, step: &str) -> Result<Value> {
    let prompt = format!("{} {}", step, page.title());
    let current = page.value();

    let answer = match page.screen() {
        Screen::TextInput | Screen::ImagePicker => {
            let text: String = Input::new()
                .with_prompt(prompt)
                .with_initial_text(current.map(Value::to_string).unwrap_or_default())
                .allow_empty(!page.is_required())
                .interact_text()?;
            Value::Text(text)
        }
        Screen::NumberInput => {
            let text: String = Input::new()
                .with_prompt(prompt)
                .with_initial_text(current.map(Value::to_string).unwrap_or_default())
                .allow_empty(!page.is_required())
                .validate_with(|input: &String| -> std::result::Result<(), &str> {
                    if input.is_empty() || input.trim().parse::<f64>().is_ok() {
                        Ok(())
                    } else {
                        Err("Please enter a number")
                    }
                })
                .interact_text()?;
            Value::Text(text)
        }
        Screen::SingleChoice => {
            let options = page.options();
            let selected = current
                .and_then(Value::as_text)
                .and_then(|v| options.iter().position(|o| *o == v))
                .unwrap_or(0);
            let index = Select::new()
                .with_prompt(prompt)
                .items(&options)
                .default(selected)
                .interact()?;
            Value::Text(options[index].to_string())
        }
        Screen::MultipleChoice => {
            let options = page.options();
            let chosen = current.and_then(Value::as_list).unwrap_or_default();
            let checked: Vec<bool> = options
                .iter()
                .map(|o| chosen.iter().any(|c| c == o))
                .collect();
            let indices = MultiSelect::new()
                .with_prompt(prompt)
                .items(&options)
                .defaults(&checked)
                .interact()?;
            Value::List(indices.into_iter().map(|i| options[i].to_string()).collect())
        }
    };

    Ok(answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagewise_core::{BranchPage, PageList};

    #[test]
    fn test_watcher_sees_branch_changes() {
        let mut model = WizardModel::from_page_list(PageList::new([
            BranchPage::new("kind", "Kind")
                .add_branch("A", [Page::text("a", "A")])
                .build(),
            Page::text("name", "Name"),
        ]))
        .unwrap();

        let watcher = Rc::new(TreeWatcher::default());
        model.register_listener(&watcher);

        model.set_value("name", "Ada").unwrap();
        assert!(!watcher.take_changed());

        model.set_value("kind", "A").unwrap();
        assert!(watcher.take_changed());
        assert!(!watcher.take_changed());
    }

    #[test]
    fn test_index_of_follows_current_sequence() {
        let mut model = WizardModel::from_page_list(PageList::new([
            BranchPage::new("kind", "Kind")
                .add_branch("A", [Page::text("a", "A")])
                .build(),
            Page::text("name", "Name"),
        ]))
        .unwrap();

        assert_eq!(index_of(&model, "name"), 1);
        model.set_value("kind", "A").unwrap();
        assert_eq!(index_of(&model, "name"), 2);
        assert_eq!(index_of(&model, "a"), 1);
    }
}
