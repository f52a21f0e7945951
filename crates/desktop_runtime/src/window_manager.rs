//! Shared window-manager transition helpers used by the desktop reducer.

use desktop_app_contract::{ApplicationId, WindowDefaults, WindowId};

use crate::{
    apps::AppDescriptor,
    model::{DesktopState, OpenWindowRequest, WindowPlacement, WindowRecord, WindowRect},
};

/// Default geometry for the window with the given sequence number.
///
/// Each new window is offset from the origin by one cascade step per slot, wrapping back to the
/// origin every `cascade_wrap` windows.
pub fn cascade_rect(
    placement: &WindowPlacement,
    sequence: u64,
    defaults: Option<WindowDefaults>,
) -> WindowRect {
    let slot = sequence % u64::from(placement.cascade_wrap.max(1));
    let slot = i32::try_from(slot).unwrap_or(i32::MAX);
    let (w, h) = defaults
        .map(|d| (d.width, d.height))
        .unwrap_or((placement.default_width, placement.default_height));
    // Placement values come from config; clamp instead of overflowing.
    WindowRect {
        x: placement
            .origin_x
            .saturating_add(slot.saturating_mul(placement.cascade_step_x)),
        y: placement
            .origin_y
            .saturating_add(slot.saturating_mul(placement.cascade_step_y)),
        w,
        h,
    }
}

/// Hands out the next window sequence number.
pub fn allocate_sequence(state: &mut DesktopState) -> u64 {
    let sequence = state.next_sequence;
    state.next_sequence = state.next_sequence.saturating_add(1);
    sequence
}

/// Hands out the next stack order; values are never reused within a session.
pub fn allocate_stack_order(state: &mut DesktopState) -> u64 {
    let order = state.next_stack_order;
    state.next_stack_order = state.next_stack_order.saturating_add(1);
    order
}

/// Builds the record for a new window without inserting it.
pub fn build_window_record(
    state: &mut DesktopState,
    descriptor: &AppDescriptor,
    request: &OpenWindowRequest,
) -> WindowRecord {
    let sequence = allocate_sequence(state);
    let mut rect = cascade_rect(&state.placement, sequence, descriptor.window_defaults);
    if let Some((x, y)) = request.position {
        rect = rect.with_position(x, y);
    }
    if let Some((w, h)) = request.size {
        rect = rect.with_size(w, h);
    }
    let stack_order = allocate_stack_order(state);
    WindowRecord {
        id: WindowId::new(descriptor.app_id.clone(), sequence),
        title: request
            .title
            .clone()
            .unwrap_or_else(|| descriptor.display_name.clone()),
        icon_id: request
            .icon_id
            .clone()
            .unwrap_or_else(|| descriptor.icon_id.clone()),
        entry: descriptor.entry.clone(),
        rect,
        restore_rect: None,
        stack_order,
        minimized: false,
        maximized: false,
        hidden: false,
    }
}

/// Existing window a single-instance open should reuse: the owner's most recently raised window.
pub fn reusable_window(state: &DesktopState, app_id: &ApplicationId) -> Option<WindowId> {
    state
        .windows_for_app(app_id)
        .max_by_key(|w| w.stack_order)
        .map(|w| w.id.clone())
}

pub fn find_window_mut<'a>(
    state: &'a mut DesktopState,
    window_id: &WindowId,
) -> Option<&'a mut WindowRecord> {
    state.windows.iter_mut().find(|w| &w.id == window_id)
}

/// Raises `window_id` above every other window and clears its minimized/hidden flags.
///
/// Returns the new stack order, or `None` when the window does not exist.
pub fn raise_window(state: &mut DesktopState, window_id: &WindowId) -> Option<u64> {
    if !state.windows.iter().any(|w| &w.id == window_id) {
        return None;
    }
    let order = allocate_stack_order(state);
    let window = find_window_mut(state, window_id)?;
    window.stack_order = order;
    window.minimized = false;
    window.hidden = false;
    Some(order)
}

/// Removes a window and returns it.
pub fn remove_window(state: &mut DesktopState, window_id: &WindowId) -> Option<WindowRecord> {
    let index = state.windows.iter().position(|w| &w.id == window_id)?;
    Some(state.windows.remove(index))
}
