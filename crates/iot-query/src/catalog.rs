//! The analytical queries run after every import.
//!
//! Statements target the DuckDB schema created by `iot-db` on connect;
//! `details` is a `JSON` column read with the `->>` text extraction operator.
//! `->>` binds looser than comparison and `AND`, so every extraction is
//! parenthesized.

/// A static query: result name, statement and positional column names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryDef {
    pub name: &'static str,
    pub sql: &'static str,
    pub columns: &'static [&'static str],
}

/// Locations that are nobody's parent.
pub const LEAF_LOCATIONS: QueryDef = QueryDef {
    name: "leaf_locations",
    sql: "SELECT l.location_name
FROM locations l
LEFT JOIN locations sub ON l.location_id = sub.parent_location_id
WHERE sub.location_id IS NULL
ORDER BY l.location_name",
    columns: &["location_name"],
};

/// Deepest descendants of every root, by root name.
pub const LOWEST_SUBLOCATIONS: QueryDef = QueryDef {
    name: "lowest_sublocations",
    sql: "WITH RECURSIVE hierarchy AS (
    SELECT
        location_id,
        location_name,
        location_id AS root_id,
        location_name AS root_name,
        0 AS depth
    FROM locations

    UNION ALL

    SELECT
        child.location_id,
        child.location_name,
        parent.root_id,
        parent.root_name,
        parent.depth + 1
    FROM locations child
    JOIN hierarchy parent ON child.parent_location_id = parent.location_id
)
SELECT root_name AS location_name, location_name AS lowest_sublocation
FROM hierarchy h1
WHERE depth = (SELECT MAX(depth) FROM hierarchy h2 WHERE h2.root_id = h1.root_id)
  AND depth > 0
ORDER BY root_name, lowest_sublocation",
    columns: &["location_name", "lowest_sublocation"],
};

/// Smart Lamp events switching on above brightness 80.
pub const SMART_LAMP_EVENTS: QueryDef = QueryDef {
    name: "smart_lamp_events",
    sql: "SELECT events.event_id
FROM events
JOIN devices ON devices.device_id = events.device_id
WHERE devices.device_type = 'Smart Lamp'
  AND (events.details->>'new_status') = 'on'
  AND CAST((events.details->>'brightness') AS INTEGER) > 80
ORDER BY events.event_id",
    columns: &["event_id"],
};

/// Mean brightness of Smart Lamp "on" events per location.
pub const AVERAGE_BRIGHTNESS: QueryDef = QueryDef {
    name: "average_brightness",
    sql: "SELECT locations.location_name,
       AVG(CAST((events.details->>'brightness') AS INTEGER)) AS average_brightness
FROM locations
JOIN devices ON devices.location_id = locations.location_id
JOIN events ON events.device_id = devices.device_id
WHERE devices.device_type = 'Smart Lamp'
  AND (events.details->>'new_status') = 'on'
GROUP BY locations.location_name
ORDER BY locations.location_name",
    columns: &["location_name", "average_brightness"],
};

/// Locations with at least one detected leak.
pub const LEAK_LOCATIONS: QueryDef = QueryDef {
    name: "leak_locations",
    sql: "SELECT DISTINCT locations.location_name
FROM locations
JOIN devices ON devices.location_id = locations.location_id
JOIN events ON events.device_id = devices.device_id
WHERE (events.details->>'leak_detected') = 'true'
ORDER BY locations.location_name",
    columns: &["location_name"],
};

/// Devices that never emitted an event.
pub const DEVICES_NO_EVENTS: QueryDef = QueryDef {
    name: "devices_no_events",
    sql: "SELECT locations.location_name, devices.device_name
FROM locations
JOIN devices ON devices.location_id = locations.location_id
LEFT JOIN events ON events.device_id = devices.device_id
WHERE events.event_id IS NULL
ORDER BY locations.location_name, devices.device_name",
    columns: &["location_name", "device_name"],
};

/// Top three locations by Smart Lamp count.
pub const TOP_SMART_LAMP_LOCATIONS: QueryDef = QueryDef {
    name: "top_smart_lamp_locations",
    sql: "SELECT l.location_name, COUNT(d.device_id) AS device_count
FROM locations l
JOIN devices d ON l.location_id = d.location_id
WHERE d.device_type = 'Smart Lamp'
GROUP BY l.location_name
ORDER BY device_count DESC, l.location_name
LIMIT 3",
    columns: &["location_name", "device_count"],
};

/// Every query, in execution and export order.
pub const QUERIES: &[QueryDef] = &[
    LEAF_LOCATIONS,
    LOWEST_SUBLOCATIONS,
    SMART_LAMP_EVENTS,
    AVERAGE_BRIGHTNESS,
    LEAK_LOCATIONS,
    DEVICES_NO_EVENTS,
    TOP_SMART_LAMP_LOCATIONS,
];

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
