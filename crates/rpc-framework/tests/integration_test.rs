use async_trait::async_trait;
use rpc_framework::{CallContext, Code, RpcError, Service, ServiceServer, Status};
use std::time::Duration;

// --- Test Service ---

#[derive(Debug)]
enum Op {
    Echo(String),
    Fail(Code, String),
    Sleep(Duration),
    Panic,
    /// Reports whether the context seen by the service carries a deadline.
    ReportDeadline,
}

struct TestService;

#[async_trait]
impl Service for TestService {
    const NAME: &'static str = "TestService";
    type Request = Op;
    type Response = String;

    async fn call(&self, ctx: &CallContext, request: Op) -> Result<String, Status> {
        match request {
            Op::Echo(text) => Ok(text),
            Op::Fail(code, message) => Err(Status::new(code, message)),
            Op::Sleep(duration) => {
                tokio::time::sleep(duration).await;
                Ok("slept".to_string())
            }
            Op::Panic => panic!("handler blew up"),
            Op::ReportDeadline => Ok(ctx.deadline().is_some().to_string()),
        }
    }
}

// --- Tests ---

#[tokio::test]
async fn test_server_full_lifecycle() {
    let (server, client) = ServiceServer::new(TestService, 10);
    let handle = tokio::spawn(server.run());
    let ctx = CallContext::background();

    // 1. Success
    let reply = client.call(&ctx, Op::Echo("hello".into())).await.unwrap();
    assert_eq!(reply, "hello");

    // 2. Structured failure passes through untouched
    let err = client
        .call(&ctx, Op::Fail(Code::NotFound, "missing".into()))
        .await
        .unwrap_err();
    let status = err.status().expect("structured status");
    assert_eq!(status.code(), Code::NotFound);
    assert_eq!(status.message(), "missing");

    // 3. Shutdown once the last client is gone
    drop(client);
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_deadline_propagates_to_slow_handler() {
    let (server, client) = ServiceServer::new(TestService, 10);
    tokio::spawn(server.run());

    let ctx = CallContext::with_timeout(Duration::from_millis(50));
    let err = client
        .call(&ctx, Op::Sleep(Duration::from_secs(3600)))
        .await
        .unwrap_err();

    assert_eq!(err.status().map(Status::code), Some(Code::DeadlineExceeded));
}

#[tokio::test]
async fn test_caller_cancellation_resolves_promptly() {
    let (server, client) = ServiceServer::new(TestService, 10);
    tokio::spawn(server.run());

    let ctx = CallContext::background();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let started = std::time::Instant::now();
    let err = client
        .call(&ctx, Op::Sleep(Duration::from_secs(3600)))
        .await
        .unwrap_err();

    assert_eq!(err.status().map(Status::code), Some(Code::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn test_already_cancelled_context_is_rejected_before_sending() {
    let (server, client) = ServiceServer::new(TestService, 10);
    tokio::spawn(server.run());

    let ctx = CallContext::background();
    ctx.cancel();

    let err = client.call(&ctx, Op::Echo("never".into())).await.unwrap_err();
    assert_eq!(err.status().map(Status::code), Some(Code::Cancelled));
}

#[tokio::test]
async fn test_service_sees_caller_deadline() {
    let (server, client) = ServiceServer::new(TestService, 10);
    tokio::spawn(server.run());

    let with_deadline = CallContext::with_timeout(Duration::from_secs(30));
    let reply = client.call(&with_deadline, Op::ReportDeadline).await.unwrap();
    assert_eq!(reply, "true");

    let reply = client
        .call(&CallContext::background(), Op::ReportDeadline)
        .await
        .unwrap();
    assert_eq!(reply, "false");
}

#[tokio::test]
async fn test_panicking_handler_is_transport_failure() {
    let (server, client) = ServiceServer::new(TestService, 10);
    let handle = tokio::spawn(server.run());

    let err = client
        .call(&CallContext::background(), Op::Panic)
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::ServiceDropped));
    assert!(err.status().is_none());

    // The server keeps serving after a handler panic.
    let reply = client
        .call(&CallContext::background(), Op::Echo("still here".into()))
        .await
        .unwrap();
    assert_eq!(reply, "still here");

    drop(client);
    handle.await.unwrap();
}

#[tokio::test]
async fn test_closed_server_is_transport_failure() {
    let (server, client) = ServiceServer::new(TestService, 10);
    drop(server);

    assert!(client.is_closed());
    let err = client
        .call(&CallContext::background(), Op::Echo("x".into()))
        .await
        .unwrap_err();
    assert!(matches!(err, RpcError::ServiceClosed));
}

#[tokio::test]
async fn test_requests_are_served_concurrently() {
    let (server, client) = ServiceServer::new(TestService, 64);
    tokio::spawn(server.run());

    // 50 requests that each sleep 200ms finish far sooner than 50 * 200ms.
    let started = std::time::Instant::now();
    let mut handles = Vec::new();
    for _ in 0..50 {
        let client = client.clone();
        handles.push(tokio::spawn(async move {
            client
                .call(&CallContext::background(), Op::Sleep(Duration::from_millis(200)))
                .await
        }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "slept");
    }

    assert!(started.elapsed() < Duration::from_secs(5));
}
