//! Hook state, effects, memoization, and setter re-renders.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use weft_core::{
    attr, deps, h, mount, nodes, on, text, unmount, Component, EffectResult, Event, NeverEqual,
    Props, Ref, Rendered, SharedHost, WidgetId,
};
use weft_testing::MemoryHost;

fn setup() -> (Rc<RefCell<MemoryHost>>, SharedHost, WidgetId) {
    let (memory, host) = MemoryHost::shared();
    let root = memory.borrow_mut().create_root();
    (memory, host, root)
}

fn counter() -> Component {
    Component::new("Counter", |scope, props| {
        let initial = props.num("initial").unwrap_or(0.0) as i32;
        let (count, set) = scope.use_state(initial);
        let label = count.to_string();
        h(
            "div",
            [on("click", move |_| set.set(count + 1))],
            nodes![label],
        )
        .into()
    })
}

#[test]
fn counter_counts_clicks_and_survives_remount() {
    let (memory, host, root) = setup();
    let counter = counter();
    let node = mount(&host, root, h(&counter, [attr("initial", 0)], []), None);
    let div = memory.borrow().find("div").unwrap();

    MemoryHost::dispatch(&memory, div, Event::new("click"));
    MemoryHost::dispatch(&memory, div, Event::new("click"));
    assert_eq!(memory.borrow().text_of(root), "2");

    // the new initial value is ignored: the instance, and its state
    // slot, survive the remount
    mount(&host, root, h(&counter, [attr("initial", 100)], []), Some(node));
    assert_eq!(memory.borrow().text_of(root), "2");
    MemoryHost::dispatch(&memory, div, Event::new("click"));
    assert_eq!(memory.borrow().text_of(root), "3");
}

#[test]
fn setter_rerender_stays_anchored_between_siblings() {
    let (memory, host, root) = setup();
    let counter = counter();
    let _node = mount(
        &host,
        root,
        h(
            "div",
            [],
            nodes![text("a"), h(&counter, [], []), text("b")],
        ),
        None,
    );
    let outer = memory.borrow().children(root)[0];
    assert_eq!(memory.borrow().text_of(outer), "a0b");

    let inner = memory.borrow().children(outer)[1];
    MemoryHost::dispatch(&memory, inner, Event::new("click"));
    assert_eq!(memory.borrow().text_of(outer), "a1b");
    assert_eq!(memory.borrow().children(outer)[1], inner);
}

#[test]
fn multi_widget_result_rerenders_in_place() {
    let (memory, host, root) = setup();
    let pair = Component::new("Pair", |scope, _| {
        let (count, set) = scope.use_state(0);
        Rendered::Nodes(vec![
            h(
                "span",
                [on("click", move |_| set.set(count + 1))],
                nodes![count.to_string()],
            ),
            h("em", [], nodes!["tail"]),
        ])
    });
    let _node = mount(
        &host,
        root,
        h("div", [], nodes![text("a"), h(&pair, [], []), text("b")]),
        None,
    );
    let div = memory.borrow().children(root)[0];
    let before = memory.borrow().children(div);
    assert_eq!(memory.borrow().text_of(div), "a0tailb");

    let span = memory.borrow().find("span").unwrap();
    MemoryHost::dispatch(&memory, span, Event::new("click"));
    assert_eq!(memory.borrow().text_of(div), "a1tailb");
    assert_eq!(memory.borrow().children(div), before);
}

#[test]
fn effects_gate_on_deps_and_clean_up_before_rerun() {
    let (_, host, root) = setup();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = log.clone();
    let logger = Component::new("Logger", move |scope, props| {
        let tag = props.str("tag").unwrap_or("").to_owned();
        let sink = sink.clone();
        scope.use_effect(deps![tag.clone()], move || {
            sink.borrow_mut().push(format!("run {tag}"));
            let sink = sink.clone();
            EffectResult::on_dispose(move || sink.borrow_mut().push(format!("drop {tag}")))
        });
        Rendered::Nothing
    });

    let node = mount(&host, root, h(&logger, [attr("tag", "a")], []), None);
    assert_eq!(*log.borrow(), ["run a"]);

    // unrelated prop change re-renders but the effect does not re-run
    let node = mount(
        &host,
        root,
        h(&logger, [attr("tag", "a"), attr("other", 1)], []),
        Some(node),
    );
    assert_eq!(*log.borrow(), ["run a"]);

    let node = mount(&host, root, h(&logger, [attr("tag", "b")], []), Some(node));
    assert_eq!(*log.borrow(), ["run a", "drop a", "run b"]);

    unmount(&host, &node);
    assert_eq!(*log.borrow(), ["run a", "drop a", "run b", "drop b"]);
}

#[test]
fn memo_recomputes_only_when_its_deps_change() {
    let (memory, host, root) = setup();
    let computed = Rc::new(Cell::new(0));
    let spy = computed.clone();
    let doubler = Component::new("Doubler", move |scope, props| {
        let a = props.num("a").unwrap_or(0.0);
        let spy = spy.clone();
        let doubled = scope.use_memo(deps![a], move || {
            spy.set(spy.get() + 1);
            a * 2.0
        });
        Rendered::Node(text(doubled.to_string()))
    });

    let node = mount(
        &host,
        root,
        h(&doubler, [attr("a", 1.0), attr("b", 1.0)], []),
        None,
    );
    assert_eq!(computed.get(), 1);
    assert_eq!(memory.borrow().text_of(root), "2");

    let node = mount(
        &host,
        root,
        h(&doubler, [attr("a", 1.0), attr("b", 2.0)], []),
        Some(node),
    );
    assert_eq!(computed.get(), 1);

    mount(
        &host,
        root,
        h(&doubler, [attr("a", 3.0), attr("b", 2.0)], []),
        Some(node),
    );
    assert_eq!(computed.get(), 2);
    assert_eq!(memory.borrow().text_of(root), "6");
}

#[test]
fn use_ref_returns_the_same_cell_every_render() {
    let (_, host, root) = setup();
    let seen = Rc::new(RefCell::new(Vec::<Ref<i32>>::new()));
    let sink = seen.clone();
    let holder = Component::new("Holder", move |scope, _| {
        let cell = scope.use_ref(|| 7);
        sink.borrow_mut().push(cell);
        Rendered::Nothing
    });

    let node = mount(&host, root, h(&holder, [attr("n", 1)], []), None);
    mount(&host, root, h(&holder, [attr("n", 2)], []), Some(node));

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0], seen[1]);
    assert_eq!(seen[0].get(), 7);
}

#[test]
#[should_panic(expected = "is use_effect but the slot is state")]
fn slot_kind_misuse_panics() {
    let (_, host, root) = setup();
    let flip = Rc::new(Cell::new(false));
    let flag = flip.clone();
    let shifty = Component::new("Shifty", move |scope, _| {
        if flag.get() {
            scope.use_effect(Vec::new(), || EffectResult::none());
        } else {
            let _ = scope.use_state(0);
        }
        Rendered::Nothing
    });

    let node = mount(&host, root, h(&shifty, [attr("n", 1)], []), None);
    flip.set(true);
    mount(&host, root, h(&shifty, [attr("n", 2)], []), Some(node));
}

#[test]
fn equivalent_props_skip_the_render() {
    let (_, host, root) = setup();
    let renders = Rc::new(Cell::new(0));
    let spy = renders.clone();
    let label = Component::new("Label", move |_, props: &Props| {
        spy.set(spy.get() + 1);
        Rendered::Node(text(props.str("label").unwrap_or("").to_owned()))
    });

    let node = mount(&host, root, h(&label, [attr("label", "x")], []), None);
    assert_eq!(renders.get(), 1);

    let node = mount(&host, root, h(&label, [attr("label", "x")], []), Some(node));
    assert_eq!(renders.get(), 1);

    mount(&host, root, h(&label, [attr("label", "y")], []), Some(node));
    assert_eq!(renders.get(), 2);
}

#[test]
fn never_equal_policy_forces_every_render() {
    let (_, host, root) = setup();
    let renders = Rc::new(Cell::new(0));
    let spy = renders.clone();
    let noisy = Component::with_policy(
        "Noisy",
        move |_, _| {
            spy.set(spy.get() + 1);
            Rendered::Nothing
        },
        NeverEqual,
    );

    let node = mount(&host, root, h(&noisy, [attr("label", "x")], []), None);
    mount(&host, root, h(&noisy, [attr("label", "x")], []), Some(node));
    assert_eq!(renders.get(), 2);
}

#[test]
fn empty_result_detaches_the_previous_widgets() {
    let (memory, host, root) = setup();
    let vanishing = Component::new("Vanishing", |scope, _| {
        let (visible, set) = scope.use_state(true);
        if visible {
            h("button", [on("click", move |_| set.set(false))], nodes!["x"]).into()
        } else {
            Rendered::Nothing
        }
    });

    let _node = mount(
        &host,
        root,
        h("div", [], nodes![text("a"), h(&vanishing, [], []), text("b")]),
        None,
    );
    let div = memory.borrow().children(root)[0];
    assert_eq!(memory.borrow().text_of(div), "axb");

    let button = memory.borrow().find("button").unwrap();
    MemoryHost::dispatch(&memory, button, Event::new("click"));
    assert_eq!(memory.borrow().text_of(div), "ab");
    assert!(memory.borrow().find("button").is_none());
}
