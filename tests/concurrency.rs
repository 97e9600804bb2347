//! Concurrent stripping and encoding of one shared tree
//!
//! Calls share no state; the input tree is only read.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use absent_codec::{decode, encode, strip, Mapping, Sequence, Value};
use std::sync::Arc;

fn shared_tree() -> Value {
    let items = Sequence::new();
    for i in 0..64 {
        items.push(Mapping::from_entries([
            ("index", Value::from(i)),
            ("skip", Value::Absent),
        ]));
    }
    Mapping::from_entries([("items", Value::from(items)), ("gone", Value::Absent)]).into()
}

#[test]
fn concurrent_strip_same_tree() {
    let tree = Arc::new(shared_tree());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let tree = Arc::clone(&tree);
            std::thread::spawn(move || {
                for _ in 0..200 {
                    let stripped = strip(&tree).expect("strip");
                    let out = stripped.as_mapping().unwrap();
                    assert_eq!(out.keys(), vec!["items".to_string()]);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread");
    }

    // Input untouched
    assert!(tree.as_mapping().unwrap().contains_key("gone"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_encode_decode_tasks() {
    use tokio::task::JoinSet;

    let tree = shared_tree();
    let expected = strip(&tree).expect("strip");

    let mut tasks = JoinSet::new();
    for _ in 0..16 {
        let tree = tree.clone();
        let expected = expected.clone();
        tasks.spawn(async move {
            for _ in 0..100 {
                let bytes = encode(&tree).expect("encode");
                assert_eq!(decode(bytes).expect("decode"), expected);
            }
        });
    }

    while let Some(res) = tasks.join_next().await {
        res.unwrap();
    }
}
