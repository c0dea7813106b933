//! When steps for board move BDD scenarios.

use super::world::{BoardWorld, column, run_async};
use ozikanban::board::domain::{BoardPosition, TaskMove};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#""{name}" is dragged to "{state}" position {index:u64}"#)]
fn drag_task(
    world: &mut BoardWorld,
    name: String,
    state: String,
    index: u64,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&name)?;
    let board = world.sync.board();
    let from = board
        .column_of(&task_id)
        .ok_or_else(|| eyre::eyre!("{name} is not on the board"))?;
    let from_index = board
        .column(from)
        .and_then(|held| held.task_ids().iter().position(|id| *id == task_id))
        .ok_or_else(|| eyre::eyre!("{name} is missing from its column"))?;

    let task_move = TaskMove::new(
        task_id,
        BoardPosition::new(from, from_index),
        BoardPosition::new(column(&state)?, usize::try_from(index)?),
    );
    world.last_move = Some(run_async(world.sync.move_task(task_move)));
    Ok(())
}

#[when("the board is reloaded")]
fn board_reloaded(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    run_async(world.sync.refresh()).wrap_err("reload the board")?;
    Ok(())
}
