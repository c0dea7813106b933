//! Then steps for board move BDD scenarios.

use super::world::{BoardWorld, column, run_async};
use ozikanban::board::{domain::TaskStatus, ports::TaskStore};
use rstest_bdd_macros::then;

#[then("the move succeeded")]
fn move_succeeded(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_move.as_ref() {
        Some(Ok(_)) => Ok(()),
        Some(Err(err)) => Err(eyre::eyre!("expected the move to succeed, got {err}")),
        None => Err(eyre::eyre!("no move was attempted")),
    }
}

#[then("the move reported a failure")]
fn move_failed(world: &BoardWorld) -> Result<(), eyre::Report> {
    match world.last_move.as_ref() {
        Some(Err(_)) => Ok(()),
        Some(Ok(record)) => Err(eyre::eyre!("expected the move to fail, got {record:?}")),
        None => Err(eyre::eyre!("no move was attempted")),
    }
}

#[then(r#"the "{state}" column lists "{names}""#)]
fn column_lists(world: &BoardWorld, state: String, names: String) -> Result<(), eyre::Report> {
    let expected: Vec<String> = names.split(',').map(|name| name.trim().to_owned()).collect();
    let actual = world.names_in(column(&state)?);
    if actual != expected {
        return Err(eyre::eyre!("expected {state} to list {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the "{state}" column is empty"#)]
fn column_is_empty(world: &BoardWorld, state: String) -> Result<(), eyre::Report> {
    let actual = world.names_in(column(&state)?);
    if !actual.is_empty() {
        return Err(eyre::eyre!("expected {state} to be empty, found {actual:?}"));
    }
    Ok(())
}

#[then(r#"the store records "{name}" as "{state}""#)]
fn store_records(world: &BoardWorld, name: String, state: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&name)?;
    let expected = TaskStatus::from(column(&state)?);
    let records = run_async(world.store.inner().list())?;
    let stored = records
        .into_iter()
        .find(|record| record.id == task_id)
        .ok_or_else(|| eyre::eyre!("{name} is missing from the store"))?;
    if stored.status != expected {
        return Err(eyre::eyre!("expected {name} stored as {expected}, found {}", stored.status));
    }
    Ok(())
}
