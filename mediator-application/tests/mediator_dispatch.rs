use async_trait::async_trait;
use mediator_application::{
    Mediator,
    behaviour::{Behaviour, DispatchResult, Next},
    behaviours::{Cancellator, Logger, Measure, RetryPolicy, Retrier, Validator},
    context::AppContext,
    error::AppError,
    handler::RequestHandler,
    request::{DynRequest, Request},
    validation::{Validate, ValidationErrors},
};
use mediator_domain::error::DomainError;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;

// -------- requests --------

struct Echo {
    id: String,
}

impl Request for Echo {
    const NAME: &'static str = "Echo";
    type Response = String;

    fn as_validate(&self) -> Option<&dyn Validate> {
        Some(self)
    }
}

impl Validate for Echo {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.id.trim().is_empty() {
            errors.add("id", "must not be empty");
        }
        errors.into_result()
    }
}

struct Unrouted;

impl Request for Unrouted {
    const NAME: &'static str = "Unrouted";
    type Response = ();
}

struct Slow {
    delay: Duration,
}

impl Request for Slow {
    const NAME: &'static str = "Slow";
    type Response = ();
}

struct Flaky;

impl Request for Flaky {
    const NAME: &'static str = "Flaky";
    type Response = u32;
}

// -------- handlers --------

#[derive(Default)]
struct EchoHandler {
    calls: AtomicU32,
}

#[async_trait]
impl RequestHandler for EchoHandler {
    type Request = Echo;

    async fn handle(&self, _ctx: &AppContext, request: &Echo) -> Result<String, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        Ok(request.id.clone())
    }
}

#[derive(Default)]
struct SlowHandler {
    calls: AtomicU32,
    observed_deadline: Mutex<Option<Instant>>,
}

#[async_trait]
impl RequestHandler for SlowHandler {
    type Request = Slow;

    async fn handle(&self, ctx: &AppContext, request: &Slow) -> Result<(), AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.observed_deadline.lock().unwrap() = ctx.deadline();
        tokio::time::sleep(request.delay).await;
        Ok(())
    }
}

/// 前 `failures` 次返回给定错误，之后成功
struct FlakyHandler {
    calls: AtomicU32,
    failures: u32,
    error: fn() -> AppError,
}

#[async_trait]
impl RequestHandler for FlakyHandler {
    type Request = Flaky;

    async fn handle(&self, _ctx: &AppContext, _request: &Flaky) -> Result<u32, AppError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if n <= self.failures {
            Err((self.error)())
        } else {
            Ok(n)
        }
    }
}

// -------- behaviours --------

struct Trace {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Behaviour for Trace {
    async fn process(
        &self,
        ctx: &AppContext,
        _request: &dyn DynRequest,
        next: Next<'_>,
    ) -> DispatchResult {
        self.log.lock().unwrap().push(format!("{}:enter", self.label));
        let result = next.run(ctx).await;
        self.log.lock().unwrap().push(format!("{}:exit", self.label));
        result
    }
}

/// 不调用后续环节，直接返回错误类型的响应
struct WrongResponse;

#[async_trait]
impl Behaviour for WrongResponse {
    async fn process(
        &self,
        _ctx: &AppContext,
        _request: &dyn DynRequest,
        _next: Next<'_>,
    ) -> DispatchResult {
        Ok(Box::new(42u8))
    }
}

fn fast_retry(max_attempts: u32) -> Retrier {
    Retrier::new(
        RetryPolicy::builder()
            .max_attempts(max_attempts)
            .initial_delay(Duration::from_millis(5))
            .max_delay(Duration::from_millis(20))
            .build(),
    )
}

fn flaky(failures: u32, error: fn() -> AppError) -> Arc<FlakyHandler> {
    Arc::new(FlakyHandler {
        calls: AtomicU32::new(0),
        failures,
        error,
    })
}

// -------- tests --------

#[tokio::test]
async fn unregistered_request_fails_before_any_behaviour() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mediator = Mediator::builder()
        .use_behaviour(Trace {
            label: "B1",
            log: log.clone(),
        })
        .register_handler(EchoHandler::default())
        .build()
        .unwrap();

    let err = mediator
        .send(&AppContext::new(), Unrouted)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::HandlerNotFound("Unrouted")));
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_handler_fails_build() {
    let result = Mediator::builder()
        .register_handler(EchoHandler::default())
        .register_handler(EchoHandler::default())
        .build();

    assert!(matches!(
        result,
        Err(AppError::DuplicateHandler { request: "Echo" })
    ));
}

#[tokio::test]
async fn behaviours_nest_in_registration_order() {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mediator = Mediator::builder()
        .use_behaviour(Trace {
            label: "B1",
            log: log.clone(),
        })
        .use_behaviour(Trace {
            label: "B2",
            log: log.clone(),
        })
        .use_behaviour(Trace {
            label: "B3",
            log: log.clone(),
        })
        .register_handler(EchoHandler::default())
        .build()
        .unwrap();

    let out = mediator
        .send(&AppContext::new(), Echo { id: "o-1".into() })
        .await
        .unwrap();

    assert_eq!(out, "o-1");
    assert_eq!(
        *log.lock().unwrap(),
        vec!["B1:enter", "B2:enter", "B3:enter", "B3:exit", "B2:exit", "B1:exit"]
    );
}

#[tokio::test]
async fn empty_pipeline_calls_handler_directly() {
    let mediator = Mediator::builder()
        .register_handler(EchoHandler::default())
        .build()
        .unwrap();

    assert_eq!(mediator.behaviour_count(), 0);
    let out = mediator
        .send(&AppContext::new(), Echo { id: "x".into() })
        .await
        .unwrap();
    assert_eq!(out, "x");
}

#[tokio::test]
async fn mismatched_response_names_the_request() {
    let mediator = Mediator::builder()
        .use_behaviour(WrongResponse)
        .register_handler(EchoHandler::default())
        .build()
        .unwrap();

    let err = mediator
        .send(&AppContext::new(), Echo { id: "o-1".into() })
        .await
        .unwrap_err();

    match err {
        AppError::TypeMismatch { expected, found } => {
            assert_eq!(expected, std::any::type_name::<String>());
            assert_eq!(found, "Echo");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn validation_failure_short_circuits_handler() {
    let handler = Arc::new(EchoHandler::default());
    let mediator = Mediator::builder()
        .use_behaviour(Logger)
        .use_behaviour(Validator)
        .register_handler(handler.clone())
        .build()
        .unwrap();

    let err = mediator
        .send(&AppContext::new(), Echo { id: "  ".into() })
        .await
        .unwrap_err();

    match err {
        AppError::Validation(errors) => {
            assert_eq!(errors.errors().len(), 1);
            assert_eq!(errors.errors()[0].field, "id");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(handler.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn cancellator_times_out_slow_handler() {
    let mediator = Mediator::builder()
        .use_behaviour(Cancellator::new(Duration::from_millis(100)))
        .register_handler(SlowHandler::default())
        .build()
        .unwrap();

    let started = Instant::now();
    let err = mediator
        .send(
            &AppContext::new(),
            Slow {
                delay: Duration::from_secs(5),
            },
        )
        .await
        .unwrap_err();
    let elapsed = started.elapsed();

    assert!(matches!(err, AppError::DeadlineExceeded));
    assert!(elapsed >= Duration::from_millis(100));
    assert!(elapsed < Duration::from_secs(2), "took {elapsed:?}");
}

#[tokio::test]
async fn handler_observes_earliest_deadline() {
    let handler = Arc::new(SlowHandler::default());
    let mediator = Mediator::builder()
        .use_behaviour(Cancellator::new(Duration::from_secs(30)))
        .register_handler(handler.clone())
        .build()
        .unwrap();

    let ctx = AppContext::new().with_timeout(Duration::from_secs(1));
    mediator
        .send(
            &ctx,
            Slow {
                delay: Duration::ZERO,
            },
        )
        .await
        .unwrap();

    let observed = handler.observed_deadline.lock().unwrap().unwrap();
    assert_eq!(Some(observed), ctx.deadline());
}

#[tokio::test]
async fn unbounded_cancellator_lets_dispatch_complete() {
    let mediator = Mediator::builder()
        .use_behaviour(Cancellator::new(Duration::MAX))
        .register_handler(EchoHandler::default())
        .build()
        .unwrap();

    let out = mediator
        .send(&AppContext::new(), Echo { id: "o-1".into() })
        .await
        .unwrap();
    assert_eq!(out, "o-1");
}

#[tokio::test]
async fn outer_retrier_retries_each_timed_out_attempt() {
    let handler = Arc::new(SlowHandler::default());
    let mediator = Mediator::builder()
        .use_behaviour(fast_retry(3))
        .use_behaviour(Cancellator::new(Duration::from_millis(30)))
        .register_handler(handler.clone())
        .build()
        .unwrap();

    let err = mediator
        .send(
            &AppContext::new(),
            Slow {
                delay: Duration::from_secs(5),
            },
        )
        .await
        .unwrap_err();

    assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
    assert!(matches!(err, AppError::RetriesExhausted { attempts: 3, .. }));
    assert!(matches!(err.root_cause(), AppError::DeadlineExceeded));
}

#[tokio::test]
async fn parent_cancellation_aborts_dispatch() {
    let mediator = Arc::new(
        Mediator::builder()
            .use_behaviour(Cancellator::new(Duration::from_secs(30)))
            .register_handler(SlowHandler::default())
            .build()
            .unwrap(),
    );

    let ctx = AppContext::new();
    let canceller = ctx.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let started = Instant::now();
    let err = mediator
        .send(
            &ctx,
            Slow {
                delay: Duration::from_secs(5),
            },
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Cancelled));
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn retrier_exhausts_budget_on_transient_errors() {
    let handler = flaky(u32::MAX, || AppError::Unavailable("db".into()));
    let mediator = Mediator::builder()
        .use_behaviour(fast_retry(3))
        .register_handler(handler.clone())
        .build()
        .unwrap();

    let err = mediator
        .send(&AppContext::new(), Flaky)
        .await
        .unwrap_err();

    assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
    match &err {
        AppError::RetriesExhausted {
            request, attempts, ..
        } => {
            assert_eq!(*request, "Flaky");
            assert_eq!(*attempts, 3);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(matches!(err.root_cause(), AppError::Unavailable(_)));
}

#[tokio::test]
async fn retrier_recovers_after_transient_failures() {
    let handler = flaky(2, || AppError::Domain(DomainError::unavailable("broker")));
    let mediator = Mediator::builder()
        .use_behaviour(fast_retry(5))
        .register_handler(handler.clone())
        .build()
        .unwrap();

    let out = mediator.send(&AppContext::new(), Flaky).await.unwrap();

    assert_eq!(out, 3);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn retrier_does_not_retry_permanent_errors() {
    let handler = flaky(u32::MAX, || {
        AppError::Domain(DomainError::invalid_state("order already shipped"))
    });
    let mediator = Mediator::builder()
        .use_behaviour(fast_retry(5))
        .register_handler(handler.clone())
        .build()
        .unwrap();

    let err = mediator
        .send(&AppContext::new(), Flaky)
        .await
        .unwrap_err();

    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    assert!(matches!(
        err,
        AppError::Domain(DomainError::InvalidState { .. })
    ));
}

#[tokio::test]
async fn single_attempt_budget_still_invokes_once() {
    let handler = flaky(u32::MAX, || AppError::Unavailable("db".into()));
    let mediator = Mediator::builder()
        .use_behaviour(fast_retry(0))
        .register_handler(handler.clone())
        .build()
        .unwrap();

    let err = mediator
        .send(&AppContext::new(), Flaky)
        .await
        .unwrap_err();

    assert_eq!(handler.calls.load(Ordering::SeqCst), 1);
    assert!(matches!(err, AppError::RetriesExhausted { attempts: 1, .. }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sends_keep_results_apart() {
    let handler = Arc::new(EchoHandler::default());
    let mediator = Arc::new(
        Mediator::builder()
            .use_behaviour(Logger)
            .use_behaviour(Validator)
            .use_behaviour(Measure)
            .use_behaviour(Cancellator::new(Duration::from_secs(5)))
            .use_behaviour(Retrier::default())
            .register_handler(handler.clone())
            .build()
            .unwrap(),
    );

    let mut set = JoinSet::new();
    for i in 0..100 {
        let mediator = mediator.clone();
        set.spawn(async move {
            let id = format!("order-{i}");
            let out = mediator
                .send(&AppContext::new(), Echo { id: id.clone() })
                .await;
            (id, out)
        });
    }

    let mut completed = 0;
    while let Some(joined) = set.join_next().await {
        let (id, out) = joined.unwrap();
        assert_eq!(out.unwrap(), id);
        completed += 1;
    }

    assert_eq!(completed, 100);
    assert_eq!(handler.calls.load(Ordering::SeqCst), 100);
}
