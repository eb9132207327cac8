use std::path::Path;

use clap::Parser;

use macro_planner_rs::cli::{Cli, Command, Toggle};
use macro_planner_rs::config::PlannerConfig;
use macro_planner_rs::error::{PlannerError, Result};
use macro_planner_rs::interface::{display_client_list, display_plan, run_editor, write_meals_csv};
use macro_planner_rs::logging;
use macro_planner_rs::models::Macro;
use macro_planner_rs::state::{closest_client, JsonFileStore, PlanSession, PlanStore};

fn main() {
    let cli = Cli::parse();
    let config = PlannerConfig::from_cli(&cli);
    logging::init(&config.log_level);

    match run(cli.command, &config) {
        Ok(()) => {}
        // The coach has already seen a notice; details are in the log.
        Err(PlannerError::Notified(_)) => std::process::exit(1),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run(command: Command, config: &PlannerConfig) -> Result<()> {
    let store = JsonFileStore::new(&config.store_path);
    tracing::debug!(store = %store.path().display(), "using plan store");

    match command {
        Command::List => {
            display_client_list(&store.clients()?);
            Ok(())
        }
        Command::Show { client, json } => cmd_show(store, &client, json),
        Command::Set {
            client,
            weight,
            activity,
            deficit,
            steps,
            protein,
        } => {
            let mut session = open_session(store, &client)?;
            if let Some(weight) = weight {
                session.set_weight(weight)?;
            }
            if let Some(activity) = activity {
                session.set_activity_level(activity.into());
            }
            if let Some(deficit) = deficit {
                session.set_deficit(deficit);
            }
            if let Some(steps) = steps {
                session.set_daily_steps(steps);
            }
            if let Some(protein) = protein {
                session.set_protein_per_kg(protein)?;
            }
            save_and_show(&mut session)
        }
        Command::Meals { client, count } => {
            let mut session = open_session(store, &client)?;
            session.set_num_meals(count)?;
            save_and_show(&mut session)
        }
        Command::Custom { client, state } => {
            let mut session = open_session(store, &client)?;
            session.set_custom_distribution(state == Toggle::On);
            save_and_show(&mut session)
        }
        Command::Meal {
            client,
            index,
            calories,
            protein,
            fat,
            carbs,
        } => {
            let mut session = open_session(store, &client)?;
            let meal = index.checked_sub(1).ok_or_else(|| {
                PlannerError::InvalidInput("meal numbers start at 1".to_string())
            })?;
            if let Some(calories) = calories {
                session.set_meal_calories(meal, calories)?;
            }
            for (which, grams) in [
                (Macro::Protein, protein),
                (Macro::Fat, fat),
                (Macro::Carbs, carbs),
            ] {
                if let Some(grams) = grams {
                    session.set_meal_macro(meal, which, grams)?;
                }
            }
            save_and_show(&mut session)
        }
        Command::Reconcile { client, mode } => {
            let mut session = open_session(store, &client)?;
            session.reconcile(mode.into())?;
            save_and_show(&mut session)
        }
        Command::Export { client, output } => cmd_export(store, &client, &output),
        Command::Edit { client } => {
            let mut session = open_session(store, &client)?;
            run_editor(&mut session)
        }
    }
}

/// Open a session, telling the coach when a new plan is being started.
fn open_session(store: JsonFileStore, client: &str) -> Result<PlanSession<JsonFileStore>> {
    let exists = store
        .contains(client)
        .map_err(|e| notify(e, client, "load"))?;

    if !exists {
        let clients = store.clients().map_err(|e| notify(e, client, "load"))?;
        match closest_client(&clients, client) {
            Some(suggestion) => eprintln!(
                "No plan stored for '{}' (did you mean '{}'?). Starting from defaults.",
                client, suggestion
            ),
            None => eprintln!("No plan stored for '{}'. Starting from defaults.", client),
        }
    }

    PlanSession::open(store, client).map_err(|e| notify(e, client, "load"))
}

/// Log the detailed error and show the coach a generic notice.
fn notify(error: PlannerError, client: &str, action: &str) -> PlannerError {
    tracing::error!(error = %error, client, action, "plan store failure");
    eprintln!("Could not {} the plan. Please try again.", action);
    PlannerError::Notified(Box::new(error))
}

fn save_and_show(session: &mut PlanSession<JsonFileStore>) -> Result<()> {
    let client = session.client_id().to_string();
    session.save().map_err(|e| notify(e, &client, "save"))?;
    tracing::info!(client = %client, "plan saved");

    display_plan(
        session.client_id(),
        session.plan(),
        &session.breakdown(),
        &session.totals(),
    );
    Ok(())
}

fn cmd_show(store: JsonFileStore, client: &str, json: bool) -> Result<()> {
    let session = open_session(store, client)?;
    let breakdown = session.breakdown();

    if json {
        println!("{}", serde_json::to_string_pretty(&breakdown)?);
    } else {
        display_plan(client, session.plan(), &breakdown, &session.totals());
    }
    Ok(())
}

fn cmd_export(store: JsonFileStore, client: &str, output: &Path) -> Result<()> {
    let session = open_session(store, client)?;
    write_meals_csv(&session.breakdown(), output)?;
    println!(
        "Exported {} meals to {}",
        session.plan().num_meals,
        output.display()
    );
    Ok(())
}
