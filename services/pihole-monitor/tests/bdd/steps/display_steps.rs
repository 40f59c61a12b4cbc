//! BDD step definitions for row-level display updates

use cucumber::then;

use crate::world::MonitorWorld;

#[then("only the bottom row was rewritten")]
fn only_bottom_rewritten(world: &mut MonitorWorld) {
    assert_eq!(world.display.rows_written_since(world.writes_before), vec![1]);
}

#[then("both rows were rewritten")]
fn both_rewritten(world: &mut MonitorWorld) {
    assert_eq!(
        world.display.rows_written_since(world.writes_before),
        vec![0, 1]
    );
}

#[then("every row is padded to the display width")]
fn rows_padded(world: &mut MonitorWorld) {
    let monitor = world.monitor.as_ref().expect("no monitor built");
    for row in 0..2 {
        let text = monitor.rendered().row(row).expect("row is unknown");
        assert_eq!(text.chars().count(), crate::world::WIDTH);
    }
}
