use uuid::Uuid;

/// Generates a stable identifier for a newly registered robot.
///
/// Generated once when a configuration entry omits its id; the value is
/// written back by the configuration layer so the identity survives
/// reloads.
pub fn robot_id() -> String {
    Uuid::new_v4().to_string()
}
