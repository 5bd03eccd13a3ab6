//! Interactive terminal rendition of the recipe form.

use clap::Args;
use tokio::io::{AsyncBufReadExt, BufReader};

use recipesync::api::RecipeApi;
use recipesync::models::RecipeId;
use recipesync::sync::RecipeForm;

use super::describe_failure;

const HELP: &str = "\
Commands:
  name <text>          set the name field
  cuisine <text>       set the cuisine field
  ingredients <text>   set the ingredients field
  favorite on|off      set the favorite checkbox
  submit               create the recipe, or save the one being edited
  edit <id>            load a recipe into the form
  cancel               clear the form and stop editing
  delete <id>          delete a recipe
  reload               fetch the list again
  list                 show the form and the list
  help                 show this help
  quit                 leave the shell";

#[derive(Args)]
pub struct ShellCommand {
    /// Only print the view when asked with `list`
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, PartialEq)]
enum Action {
    Name(String),
    Cuisine(String),
    Ingredients(String),
    Favorite(bool),
    Submit,
    Edit(RecipeId),
    Cancel,
    Delete(RecipeId),
    Reload,
    List,
    Help,
    Quit,
}

fn parse_line(line: &str) -> Result<Option<Action>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };

    let require_id = |arg: &str| {
        if arg.is_empty() {
            Err(format!("Usage: {} <id>", cmd))
        } else {
            Ok(RecipeId::from(arg))
        }
    };

    let action = match cmd.to_lowercase().as_str() {
        "name" => Action::Name(arg.to_string()),
        "cuisine" => Action::Cuisine(arg.to_string()),
        "ingredients" => Action::Ingredients(arg.to_string()),
        "favorite" | "fav" => match arg.to_lowercase().as_str() {
            "on" | "yes" | "true" | "y" => Action::Favorite(true),
            "off" | "no" | "false" | "n" => Action::Favorite(false),
            _ => return Err("Usage: favorite on|off".to_string()),
        },
        "submit" | "save" => Action::Submit,
        "edit" => Action::Edit(require_id(arg)?),
        "cancel" => Action::Cancel,
        "delete" | "rm" => Action::Delete(require_id(arg)?),
        "reload" => Action::Reload,
        "list" | "ls" => Action::List,
        "help" | "?" => Action::Help,
        "quit" | "exit" | "q" => Action::Quit,
        other => return Err(format!("Unknown command: {}. Type 'help'.", other)),
    };
    Ok(Some(action))
}

impl ShellCommand {
    /// Runs the read-eval-render loop until `quit` or end of input.
    pub async fn run<A: RecipeApi>(
        &self,
        form: &mut RecipeForm<A>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        println!("{}", form);
        println!("Type 'help' for commands.");

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            let action = match parse_line(&line) {
                Ok(Some(action)) => action,
                Ok(None) => continue,
                Err(msg) => {
                    eprintln!("{}", msg);
                    continue;
                }
            };

            let show_view = match apply(form, action).await {
                Step::Continue(show) => show,
                Step::Quit => break,
            };
            if show_view && !self.quiet {
                println!("{}", form);
            }
        }
        Ok(())
    }
}

enum Step {
    /// Keep going; `true` when the view changed and should be redrawn.
    Continue(bool),
    Quit,
}

async fn apply<A: RecipeApi>(form: &mut RecipeForm<A>, action: Action) -> Step {
    let result = match action {
        Action::Name(v) => {
            form.set_name(v);
            Ok(())
        }
        Action::Cuisine(v) => {
            form.set_cuisine(v);
            Ok(())
        }
        Action::Ingredients(v) => {
            form.set_ingredients(v);
            Ok(())
        }
        Action::Favorite(v) => {
            form.set_favorite(v);
            Ok(())
        }
        Action::Submit => form.submit().await.map(|_| ()),
        Action::Edit(id) => form.begin_edit(&id).map(|_| ()),
        Action::Cancel => {
            form.cancel_edit();
            Ok(())
        }
        Action::Delete(id) => form.remove(&id).await,
        Action::Reload => form.load_all().await.map(|_| ()),
        Action::List => return Step::Continue(true),
        Action::Help => {
            println!("{}", HELP);
            return Step::Continue(false);
        }
        Action::Quit => return Step::Quit,
    };

    if let Err(e) = result {
        eprintln!("{}", describe_failure(form, &e));
    }
    Step::Continue(true)
}
