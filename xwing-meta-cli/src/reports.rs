//! CSV report writers.
//!
//! Column layouts are fixed; text cells that may contain commas or spaces
//! are quoted with [`csv_text`].

use anyhow::Result;
use std::io::Write;

use xwing_meta::{Catalog, Faction, ListInstance, ListStats, Ship, UsageBook};

/// Ship actions reported as columns of `ships.csv`.
pub const ACTIONS: &[&str] = &[
    "Focus",
    "Target Lock",
    "Barrel Roll",
    "Evade",
    "Boost",
    "Cloak",
    "SLAM",
    "Rotate Arc",
];

/// Upgrade slots reported as columns of `pilots.csv`.
pub const SLOTS: &[&str] = &[
    "Elite",
    "Astromech",
    "Salvaged Astromech",
    "Crew",
    "System",
    "Tech",
    "Turret",
    "Torpedo",
    "Missile",
    "Cannon",
    "Bomb",
    "Illicit",
];

const USAGE_COLUMNS: &[&str] = &[
    "Total",
    "World Championship",
    "Nationals",
    "Regional",
    "Store Championship",
    "Vassal",
    "Other",
];

/// Quote a text cell, doubling embedded quotes.
pub fn csv_text(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

/// A header or flag cell: quoted only when it contains a space.
fn label(text: &str) -> String {
    if text.contains(' ') {
        csv_text(text)
    } else {
        text.to_string()
    }
}

fn flag(present: bool, text: &str) -> String {
    if present { label(text) } else { String::new() }
}

fn join<I>(cells: I) -> String
where
    I: IntoIterator,
    I::Item: ToString,
{
    cells
        .into_iter()
        .map(|cell| cell.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn faction_flags(ship: &Ship) -> String {
    join(
        Faction::ALL
            .iter()
            .map(|faction| flag(ship.factions.contains(faction), faction.as_str())),
    )
}

pub fn write_ships(out: &mut dyn Write, catalog: &Catalog) -> Result<()> {
    writeln!(
        out,
        "Name,Rebel,Imperial,Scum,Size,Attack,Agility,Hull,Shields,{},XWS",
        join(ACTIONS.iter().map(|action| label(action)))
    )?;
    for ship in catalog.ships() {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{}",
            csv_text(&ship.name),
            faction_flags(ship),
            ship.size,
            ship.attack,
            ship.agility,
            ship.hull,
            ship.shields,
            join(
                ACTIONS
                    .iter()
                    .map(|action| flag(ship.has_action(action), action))
            ),
            ship.xws
        )?;
    }
    Ok(())
}

/// One row per display name shared by several pilots, listing each pilot's
/// short code, ship name and ship code.
pub fn write_pilot_duplicates(out: &mut dyn Write, catalog: &Catalog) -> Result<()> {
    for (name, ids) in catalog.duplicate_names() {
        write!(out, "{}", csv_text(name))?;
        for &id in ids {
            let pilot = catalog.pilot(id);
            let ship = catalog.ship(pilot.ship);
            write!(out, ",{},{},{}", pilot.xws, csv_text(&ship.name), ship.xws)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_pilots(out: &mut dyn Write, catalog: &Catalog, usage: &UsageBook) -> Result<()> {
    let mut header = vec![
        "Name", "XWS", "Faction", "Ship", "Unique", "Size", "Points", "Skill", "Attack",
        "Agility", "Hull", "Shields",
    ]
    .into_iter()
    .map(str::to_string)
    .collect::<Vec<_>>();
    header.extend(SLOTS.iter().map(|slot| label(slot)));
    for window in ["All Time", "Recent"] {
        header.extend(
            USAGE_COLUMNS
                .iter()
                .map(|column| csv_text(&format!("{column} {window} Uses"))),
        );
    }
    writeln!(out, "{}", header.join(","))?;

    for id in catalog.reportable_pilots() {
        let pilot = catalog.pilot(id);
        let ship = catalog.ship(pilot.ship);
        let counts = usage.get(id);
        let slots = SLOTS
            .iter()
            .map(|slot| pilot.slots.iter().filter(|s| s == slot).count());
        let uses = [counts.all_time, counts.recent]
            .into_iter()
            .flat_map(|u| std::iter::once(u.total()).chain(u.tiers()));
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            csv_text(&pilot.name),
            pilot.xws,
            pilot.faction,
            csv_text(&pilot.ship_name),
            if pilot.unique { "unique" } else { "" },
            ship.size,
            pilot.points,
            pilot.skill,
            ship.attack,
            ship.agility,
            ship.hull,
            ship.shields,
            join(slots),
            join(uses)
        )?;
    }
    Ok(())
}

pub fn write_lists(out: &mut dyn Write, lists: &[(&ListInstance, ListStats)]) -> Result<()> {
    writeln!(
        out,
        "Date,Scope,Country,State,{},Rank,Faction,{},{},{},{},{},Skill,Attack,Agility,Hull,Shields,List",
        csv_text("# Players"),
        csv_text("Ship Points"),
        csv_text("# Ships"),
        csv_text("# Uniques"),
        csv_text("# Large"),
        csv_text("# Small"),
    )?;
    for (instance, stats) in lists {
        writeln!(
            out,
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            csv_text(&instance.event_date),
            csv_text(&instance.event_scope),
            csv_text(&instance.event_country),
            csv_text(&instance.event_state),
            instance.event_players,
            instance.event_rank,
            instance.list.faction,
            stats.sum_points,
            stats.num_ships,
            stats.num_uniques,
            stats.num_large,
            stats.num_small,
            stats.sum_skill,
            stats.sum_attack,
            stats.sum_agility,
            stats.sum_hull,
            stats.sum_shields,
            csv_text(&stats.text)
        )?;
    }
    Ok(())
}
