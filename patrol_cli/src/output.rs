use comfy_table::{Cell, Table, presets::UTF8_FULL};
use patrol_optimizer::{
    json::types::JsonRoute,
    problem::location::LocationIdx,
    solver::{route::Route, schedule_table::ScheduleTable},
};

pub fn routes_table(routes: &ScheduleTable<Route>, depot: LocationIdx) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Shift", "Vehicle", "Start", "End", "Visits", "Route"]);

    for (shift, vehicle, route) in routes.iter() {
        let start = route.first().map(|stop| stop.arrival_time).unwrap_or_default();
        let end = route.last_timestamp().unwrap_or_default();
        let locations = route
            .locations()
            .map(|location| location.to_string())
            .collect::<Vec<_>>()
            .join(" → ");

        table.add_row(vec![
            Cell::new(shift),
            Cell::new(vehicle),
            Cell::new(start),
            Cell::new(end),
            Cell::new(route.patrol_stops(depot).count()),
            Cell::new(locations),
        ]);
    }

    table
}

pub fn routes_json(routes: &ScheduleTable<Route>) -> Result<String, anyhow::Error> {
    Ok(serde_json::to_string_pretty(&JsonRoute::from_table(routes))?)
}
