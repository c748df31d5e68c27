use crate::models::device::Device;
use crate::models::direction::{Direction, DirectionPolicy};
use crate::models::punch::{NormalizedEvent, RawPunchRecord};

/// Punch codes that mean "check in" / "check out" under the `Auto` policy.
const IN_CODES: [i32; 2] = [0, 4];
const OUT_CODES: [i32; 2] = [1, 5];

/// Map a device punch code to a direction.
/// Unknown codes under `Auto` yield `None`; the event is still forwarded.
pub fn normalize(punch_code: i32, policy: DirectionPolicy) -> Option<Direction> {
    match policy {
        DirectionPolicy::In => Some(Direction::In),
        DirectionPolicy::Out => Some(Direction::Out),
        DirectionPolicy::Auto if IN_CODES.contains(&punch_code) => Some(Direction::In),
        DirectionPolicy::Auto if OUT_CODES.contains(&punch_code) => Some(Direction::Out),
        DirectionPolicy::Auto => None,
    }
}

pub fn to_event(record: &RawPunchRecord, device: &Device) -> NormalizedEvent {
    NormalizedEvent {
        employee_field_value: record.user_id.clone(),
        timestamp: record.timestamp,
        device_id: device.device_id.clone(),
        direction: normalize(record.punch_code, device.punch_direction),
    }
}
