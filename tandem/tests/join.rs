use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tandem::time::{instrumented, sleep};
use tandem::{RuntimeBuilder, join};

#[test]
fn test_join_empty() {
    let rt = RuntimeBuilder::new().build().unwrap();

    let () = rt.block_on(async { join!() });
}

#[test]
fn test_join_single_future() {
    let rt = RuntimeBuilder::new().build().unwrap();

    let result = rt.block_on(async { join!(async { 42 }) });

    assert_eq!(result, 42);
}

#[test]
fn test_join_keeps_argument_order() {
    let rt = RuntimeBuilder::new().build().unwrap();

    let result = rt.block_on(async {
        join!(
            async {
                sleep(Duration::from_millis(30)).await;
                "slow"
            },
            async { 7 },
            async {
                sleep(Duration::from_millis(10)).await;
                vec![1, 2, 3]
            },
        )
    });

    assert_eq!(result, ("slow", 7, vec![1, 2, 3]));
}

#[test]
fn test_join_runs_futures_concurrently() {
    let rt = RuntimeBuilder::new().worker_threads(1).build().unwrap();

    let ((), elapsed) = rt.block_on(async {
        instrumented(async {
            join!(
                sleep(Duration::from_millis(100)),
                sleep(Duration::from_millis(100)),
                sleep(Duration::from_millis(100))
            );
        })
        .await
    });

    assert!(elapsed >= Duration::from_millis(100));
    assert!(
        elapsed < Duration::from_millis(250),
        "three 100ms sleeps took {elapsed:?}, expected them to overlap"
    );
}

#[test]
fn test_join_side_effects_all_happen() {
    let rt = RuntimeBuilder::new().build().unwrap();
    let counter = Arc::new(AtomicUsize::new(0));

    let c1 = counter.clone();
    let c2 = counter.clone();
    let c3 = counter.clone();

    rt.block_on(async move {
        join!(
            async move {
                c1.fetch_add(1, Ordering::SeqCst);
            },
            async move {
                c2.fetch_add(10, Ordering::SeqCst);
            },
            async move {
                c3.fetch_add(100, Ordering::SeqCst);
            }
        );
    });

    assert_eq!(counter.load(Ordering::SeqCst), 111);
}

#[test]
fn test_join_completion_order_follows_delays() {
    let rt = RuntimeBuilder::new().build().unwrap();
    let order = Arc::new(Mutex::new(Vec::new()));

    let long = order.clone();
    let short = order.clone();

    rt.block_on(async move {
        join!(
            async move {
                sleep(Duration::from_millis(60)).await;
                long.lock().unwrap().push("long");
            },
            async move {
                sleep(Duration::from_millis(20)).await;
                short.lock().unwrap().push("short");
            }
        );
    });

    assert_eq!(*order.lock().unwrap(), ["short", "long"]);
}

#[test]
fn test_join_with_result_types() {
    let rt = RuntimeBuilder::new().build().unwrap();

    let result = rt.block_on(async {
        join!(async { Ok::<i32, &str>(100) }, async {
            Err::<i32, &str>("error")
        })
    });

    assert_eq!(result, (Ok(100), Err("error")));
}
