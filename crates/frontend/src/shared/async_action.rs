//! Async callbacks passed from a page into its dialogs.
//!
//! Leptos `Callback` is synchronous; dialogs that await the caller's save or
//! delete use [`AsyncCallback`] instead and swallow its failure after logging
//! it. The caller owns the user-visible error channel.

use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

pub type LocalBoxFuture<T> = Pin<Box<dyn Future<Output = T>>>;

pub type AsyncCallback<T> = Rc<dyn Fn(T) -> LocalBoxFuture<Result<(), String>>>;

pub fn async_callback<T, F, Fut>(f: F) -> AsyncCallback<T>
where
    F: Fn(T) -> Fut + 'static,
    Fut: Future<Output = Result<(), String>> + 'static,
{
    Rc::new(move |value| Box::pin(f(value)))
}

/// Awaits the callback; a failure is logged and reported as `false`.
pub async fn run_logged<T>(action: &AsyncCallback<T>, value: T, context: &str) -> bool {
    match action(value).await {
        Ok(()) => true,
        Err(e) => {
            log::error!("{}: {}", context, e);
            false
        }
    }
}

/// A dialog action is dispatched only when no request is in flight.
pub fn should_dispatch(is_loading: bool) -> bool {
    !is_loading
}

/// Like [`run_logged`], but does nothing while `is_loading` is set.
pub async fn dispatch_logged<T>(
    is_loading: bool,
    action: &AsyncCallback<T>,
    value: T,
    context: &str,
) -> bool {
    if !should_dispatch(is_loading) {
        return false;
    }
    run_logged(action, value, context).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[tokio::test]
    async fn test_run_logged_reports_outcome() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let action: AsyncCallback<u32> = async_callback(move |n: u32| {
            let counter = counter.clone();
            async move {
                counter.set(counter.get() + 1);
                if n % 2 == 0 {
                    Ok(())
                } else {
                    Err(format!("odd value {}", n))
                }
            }
        });

        assert!(run_logged(&action, 2, "even").await);
        assert!(!run_logged(&action, 3, "odd").await);
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_skipped_while_loading() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();
        let action: AsyncCallback<u32> = async_callback(move |_| {
            let counter = counter.clone();
            async move {
                counter.set(counter.get() + 1);
                Ok(())
            }
        });

        assert!(!dispatch_logged(true, &action, 1, "busy").await);
        assert_eq!(calls.get(), 0);

        assert!(dispatch_logged(false, &action, 1, "idle").await);
        assert_eq!(calls.get(), 1);
    }
}
