use std::rc::Rc;

use desktop_app_contract::{AppManifest, ApplicationId, DesktopEventKind, WindowId};
use desktop_runtime::{DesktopConfig, DesktopContext, OpenWindowRequest, ReducerError};
use platform_host::{HostServices, StaticDiscovery};
use pretty_assertions::assert_eq;

fn id(raw: &str) -> ApplicationId {
    ApplicationId::trusted(raw)
}

fn boot() -> DesktopContext {
    let host = HostServices::in_memory().with_discovery(Rc::new(StaticDiscovery::new(vec![
        AppManifest::new(id("notes"), "Notes").on_desktop(),
        AppManifest::new(id("calc"), "Calculator").single_instance(),
        AppManifest::new(id("clock"), "Clock"),
    ])));
    DesktopContext::init(&DesktopConfig::default(), host)
}

fn max_stack_order(context: &DesktopContext) -> u64 {
    context
        .list_windows()
        .iter()
        .map(|w| w.stack_order)
        .max()
        .unwrap_or_default()
}

#[test]
fn notes_scenario_opens_two_windows_and_closes_the_first() {
    let mut context = boot();

    let first = context.open(&id("notes")).expect("open notes");
    assert_eq!(first.to_string(), "notes-0");
    assert_eq!(context.find_window(&first).expect("first").stack_order, 1000);

    let second = context.open(&id("notes")).expect("open notes again");
    assert_eq!(second.to_string(), "notes-1");
    assert_eq!(context.find_window(&second).expect("second").stack_order, 1001);

    assert!(context.close(&id("notes")));
    let remaining = context
        .list_windows()
        .iter()
        .map(|w| w.id.to_string())
        .collect::<Vec<_>>();
    assert_eq!(remaining, vec!["notes-1".to_string()]);
}

#[test]
fn calc_scenario_reuses_the_single_instance_window() {
    let mut context = boot();

    let calc = context.open(&id("calc")).expect("open calc");
    assert_eq!(calc.to_string(), "calc-0");
    context.minimize(&calc).expect("minimize calc");
    assert!(context.find_window(&calc).expect("calc").minimized);

    let again = context.open(&id("calc")).expect("reopen calc");
    assert_eq!(again, calc);
    let record = context.find_window(&calc).expect("calc");
    assert!(!record.minimized);
    assert!(!record.hidden);
    assert_eq!(context.list_windows().len(), 1);
}

#[test]
fn non_single_instance_apps_get_distinct_windows() {
    let mut context = boot();
    let a = context.open(&id("clock")).expect("open");
    let b = context.open(&id("clock")).expect("open");
    assert_ne!(a, b);
}

#[test]
fn window_ids_are_unique_and_stack_orders_strictly_increase() {
    let mut context = boot();
    let apps = ["notes", "clock", "notes", "calc", "clock", "notes", "calc", "clock", "notes"];
    let mut seen_ids = Vec::new();
    let mut last_order = 0;
    for app in apps {
        let window_id = context.open(&id(app)).expect("open");
        let order = context.find_window(&window_id).expect("window").stack_order;
        assert!(order > last_order, "{order} should exceed {last_order}");
        last_order = order;
        if app == "calc" {
            continue;
        }
        assert!(!seen_ids.contains(&window_id), "{window_id} reused");
        seen_ids.push(window_id);
    }
    // Plus the one reused calc window.
    assert_eq!(context.list_windows().len(), seen_ids.len() + 1);
}

#[test]
fn stack_orders_are_never_reused_after_close() {
    let mut context = boot();
    let first = context.open(&id("notes")).expect("open");
    let first_order = context.find_window(&first).expect("window").stack_order;
    context.close_window(&first).expect("close");

    let next = context.open(&id("notes")).expect("open");
    assert_eq!(next.to_string(), "notes-1");
    assert!(context.find_window(&next).expect("window").stack_order > first_order);
}

#[test]
fn focus_puts_the_window_on_top() {
    let mut context = boot();
    let a = context.open(&id("notes")).expect("open");
    let _b = context.open(&id("clock")).expect("open");
    let _c = context.open(&id("calc")).expect("open");

    context.focus(&a).expect("focus");
    let focused = context.find_window(&a).expect("window").stack_order;
    assert_eq!(focused, max_stack_order(&context));
    assert_eq!(context.topmost().map(|w| &w.id), Some(&a));
}

#[test]
fn minimize_then_toggle_restores_and_raises() {
    let mut context = boot();
    let a = context.open(&id("notes")).expect("open");
    let _b = context.open(&id("clock")).expect("open");

    context.minimize(&a).expect("minimize");
    assert!(!context.find_window(&a).expect("window").is_active());
    context.toggle_minimize(&a).expect("toggle");

    let record = context.find_window(&a).expect("window");
    assert!(record.is_active());
    assert_eq!(record.stack_order, max_stack_order(&context));
}

#[test]
fn close_without_open_window_is_a_no_op() {
    let mut context = boot();
    let _notes = context.open(&id("notes")).expect("open");
    let before = context.list_windows().to_vec();

    assert!(!context.close(&id("clock")));
    assert!(!context.close(&id("paint")));
    assert_eq!(context.list_windows(), before.as_slice());
}

#[test]
fn open_unknown_application_is_rejected() {
    let mut context = boot();
    assert_eq!(
        context.open(&id("paint")),
        Err(ReducerError::UnknownApplication(id("paint")))
    );
    assert!(context.list_windows().is_empty());
}

#[test]
fn operations_on_closed_windows_report_not_found() {
    let mut context = boot();
    let win = context.open(&id("notes")).expect("open");
    context.close_window(&win).expect("close");
    assert_eq!(
        context.focus(&win),
        Err(ReducerError::WindowNotFound(win.clone()))
    );
    assert_eq!(
        context.maximize(&win),
        Err(ReducerError::WindowNotFound(win.clone()))
    );
    assert_eq!(
        context.close_window(&win),
        Err(ReducerError::WindowNotFound(win))
    );
}

#[test]
fn open_overrides_apply_after_defaults() {
    let mut context = boot();
    let win = context
        .open_with(
            OpenWindowRequest::new(id("notes"))
                .with_title("Shopping list")
                .at(300, 200),
        )
        .expect("open");
    let record = context.find_window(&win).expect("window");
    assert_eq!(record.title, "Shopping list");
    assert_eq!((record.rect.x, record.rect.y), (300, 200));
    assert_eq!((record.rect.w, record.rect.h), (420, 300));
}

#[test]
fn presentation_geometry_writes_are_accepted() {
    let mut context = boot();
    let win = context.open(&id("notes")).expect("open");
    context.move_window(&win, -10, 5).expect("move");
    context.resize_window(&win, 800, 600).expect("resize");
    let rect = context.find_window(&win).expect("window").rect;
    assert_eq!((rect.x, rect.y, rect.w, rect.h), (-10, 5, 800, 600));
}

#[test]
fn taskbar_reflects_activity() {
    let mut context = boot();
    let a = context.open(&id("notes")).expect("open");
    let b = context.open(&id("clock")).expect("open");
    context.hide(&b).expect("hide");

    let taskbar = context.taskbar();
    let activity = taskbar
        .iter()
        .map(|entry| (entry.window_id.clone(), entry.active))
        .collect::<Vec<_>>();
    assert_eq!(activity, vec![(a, true), (b, false)]);
}

#[test]
fn uninstall_closes_every_window_of_the_application() {
    let mut context = boot();
    let _a = context.open(&id("notes")).expect("open");
    let clock = context.open(&id("clock")).expect("open");
    let _b = context.open(&id("notes")).expect("open");

    let closed = Rc::new(std::cell::RefCell::new(Vec::<WindowId>::new()));
    let sink = Rc::clone(&closed);
    context
        .bus()
        .subscribe(DesktopEventKind::WindowClosed, move |event| {
            if let Some(window_id) = event.window_id() {
                sink.borrow_mut().push(window_id.clone());
            }
            Ok(())
        });

    context.uninstall(&id("notes")).expect("uninstall");
    assert_eq!(closed.borrow().len(), 2);
    assert_eq!(
        context
            .list_windows()
            .iter()
            .map(|w| w.id.clone())
            .collect::<Vec<_>>(),
        vec![clock]
    );
    assert_eq!(
        context.open(&id("notes")),
        Err(ReducerError::UnknownApplication(id("notes")))
    );
    assert_eq!(
        context.uninstall(&id("notes")),
        Err(ReducerError::ApplicationNotFound(id("notes")))
    );
}

#[test]
fn installed_applications_follow_builtins_in_registry_order() {
    let mut context = boot();
    context
        .install(AppManifest::new(id("paint"), "Paint"))
        .expect("install");
    assert_eq!(
        context.install(AppManifest::new(id("notes"), "Notes")),
        Err(ReducerError::DuplicateApplication(id("notes")))
    );
    let ids = context
        .registry()
        .list()
        .map(|d| d.app_id.to_string())
        .collect::<Vec<_>>();
    assert_eq!(ids, vec!["notes", "calc", "clock", "paint"]);
    assert_eq!(context.registry().desktop_icon_apps().len(), 1);
}

#[test]
fn failing_subscriber_does_not_break_operations() {
    let mut context = boot();
    context
        .bus()
        .subscribe(DesktopEventKind::WindowOpened, |_| panic!("subscriber bug"));
    let hits = Rc::new(std::cell::Cell::new(0));
    let counter = Rc::clone(&hits);
    context
        .bus()
        .subscribe(DesktopEventKind::WindowOpened, move |_| {
            counter.set(counter.get() + 1);
            Ok(())
        });

    let win = context.open(&id("notes")).expect("open despite faulty subscriber");
    assert_eq!(hits.get(), 1);
    assert!(context.find_window(&win).is_some());
}
