use super::{
    ast::Stmt, choice::ScriptedChooser, config::DoStrategy, environment::Store,
    error::RuntimeError, interpreter::Interpreter,
};

/// Every distinct final store the big-step evaluator can reach from
/// `store`, found by replaying each possible sequence of choices.
///
/// Stops after `limit` runs. A `Do` that fails to terminate under some
/// choice sequence makes this call fail to terminate as well.
pub fn outcomes(
    stmt: &Stmt,
    store: &Store,
    do_strategy: DoStrategy,
    limit: usize,
) -> Result<Vec<Store>, RuntimeError> {
    let mut found: Vec<Store> = Vec::new();
    let mut script = Vec::new();
    for _ in 0..limit {
        let mut chooser = ScriptedChooser::new(script);
        let result =
            Interpreter::with_chooser(&mut chooser, do_strategy).evaluate_statement(stmt, store.clone())?;
        tracing::trace!(trace = ?chooser.trace(), "explored");
        if !found.contains(&result) {
            found.push(result);
        }
        match chooser.next_script() {
            Some(next) => script = next,
            None => break,
        }
    }
    Ok(found)
}
