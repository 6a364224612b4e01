//! Stateful counter mounted into the in-memory host.
//!
//! Run with `RUST_LOG=trace` to watch the engine's reconciliation
//! decisions.

use log::info;
use weft_core::{attr, h, mount, nodes, on, Component, Event};
use weft_testing::MemoryHost;

fn counter() -> Component {
    Component::new("Counter", |scope, props| {
        let initial = props.num("initial").unwrap_or(0.0) as i32;
        let (count, set) = scope.use_state(initial);
        let label = format!("count: {count}");
        h(
            "button",
            [
                attr("class", "counter"),
                on("click", move |_| set.set(count + 1)),
            ],
            nodes![label],
        )
        .into()
    })
}

fn main() {
    env_logger::init();

    let (memory, host) = MemoryHost::shared();
    let root = memory.borrow_mut().create_root();

    let app = counter();
    let _tree = mount(&host, root, h(&app, [attr("initial", 0)], []), None);
    info!("mounted: {}", memory.borrow().render_children(root));

    let button = memory
        .borrow()
        .find("button")
        .expect("the counter renders a button");
    for _ in 0..3 {
        MemoryHost::dispatch(&memory, button, Event::new("click"));
        info!("clicked: {}", memory.borrow().render_children(root));
    }

    println!("{}", memory.borrow().render_children(root));
}
