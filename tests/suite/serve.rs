//! Serve loop tests

use std::sync::Arc;

use dynacall_engine::{ServeStats, serve};
use tokio::io::BufReader;

use crate::common::{Arith, Faulty, server_with};

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn panicking_requests_do_not_stop_the_loop() {
    let server = Arc::new(server_with(vec![Arc::new(Faulty), Arc::new(Arith)]));
    let input = [
        r#"{"method":"PanicString","args":[3]}"#,
        r#"{"method":"Add","args":[2,2]}"#,
        r#"{"method":"PanicOther"}"#,
        r#"{"method":"Sub","args":[2,1]}"#,
    ]
    .join("\n");

    let mut output = Vec::new();
    let stats = serve(server, BufReader::new(input.as_bytes()), &mut output, 3)
        .await
        .unwrap();

    assert_eq!(
        stats,
        ServeStats {
            requests: 4,
            failures: 2
        }
    );
    let output = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(
        lines,
        vec![
            r#"{"error":{"kind":"runtime_failure","message":"failed with code 3"}}"#,
            r#"{"result":[4]}"#,
            r#"{"error":{"kind":"runtime_failure","message":"Unknown error"}}"#,
            r#"{"result":[1]}"#,
        ]
    );
}
