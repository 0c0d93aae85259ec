//! Apply, call, then commit or roll back.

use std::future::Future;

use storyline_core::ApiResult;
use tracing::debug;

use super::Store;

/// Runs one optimistic mutation against `store`.
///
/// `apply` changes the slice immediately and returns a marker (a placeholder
/// id, a previous value). `call` is then awaited with no lock held. On
/// success `commit` reconciles the slice with the server's answer; on
/// failure `rollback` undoes `apply` and the error is returned unchanged.
///
/// Overlapping mutations on the same slice are last-write-wins.
pub async fn optimistic<S, M, T, A, F, C, R>(
    store: &Store<S>,
    apply: A,
    call: F,
    commit: C,
    rollback: R,
) -> ApiResult<T>
where
    A: FnOnce(&mut S) -> M,
    F: Future<Output = ApiResult<T>>,
    C: FnOnce(&mut S, M, &T),
    R: FnOnce(&mut S, M),
{
    let marker = store.update(apply);

    match call.await {
        Ok(value) => {
            store.update(|state| commit(state, marker, &value));
            Ok(value)
        }
        Err(err) => {
            debug!(error = %err, "Optimistic mutation failed, rolling back");
            store.update(|state| rollback(state, marker));
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::Value;
    use storyline_core::ApiError;

    #[tokio::test]
    async fn test_commit_sees_server_value() {
        let store = Store::new(0_u32);
        let result = optimistic(
            &store,
            |n| {
                let previous = *n;
                *n += 1;
                previous
            },
            async { Ok::<_, ApiError>(5_u32) },
            |n, _, server| *n = *server,
            |n, previous| *n = previous,
        )
        .await;

        assert_eq!(result.unwrap(), 5);
        assert_eq!(store.snapshot(), 5);
    }

    #[tokio::test]
    async fn test_rollback_restores_previous() {
        let store = Store::new(3_u32);
        let result: ApiResult<u32> = optimistic(
            &store,
            |n| {
                let previous = *n;
                *n += 1;
                previous
            },
            async { Err(ApiError::http(StatusCode::BAD_REQUEST, Value::Null)) },
            |n, _, server| *n = *server,
            |n, previous| *n = previous,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(store.snapshot(), 3);
    }

    #[tokio::test]
    async fn test_applied_state_visible_while_call_pending() {
        let store = Store::new(Vec::<&str>::new());
        let observer = store.clone();
        let result = optimistic(
            &store,
            |items| items.push("draft"),
            async move {
                assert_eq!(observer.snapshot(), vec!["draft"]);
                Ok::<_, ApiError>("saved")
            },
            |items, _, saved| {
                items.clear();
                items.push(*saved);
            },
            |items, _| items.clear(),
        )
        .await;

        assert_eq!(result.unwrap(), "saved");
        assert_eq!(store.snapshot(), vec!["saved"]);
    }
}
