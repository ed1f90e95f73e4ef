//! Ensures help lists every registered command exactly once.
use spider_raid_bot::commands::help::all_command_names;
use spider_raid_bot::commands::raid::RaidCommand;

#[test]
fn help_command_names_unique_and_present() {
    let names = all_command_names();
    let mut sorted = names.clone();
    sorted.sort();
    for w in sorted.windows(2) {
        assert_ne!(w[0], w[1], "Duplicate help command name: {}", w[0]);
    }
    let expected = [
        "start",
        "status",
        "attack",
        "flame",
        "lightning",
        "shield",
        "help",
    ];
    for e in expected {
        assert!(names.contains(&e), "Missing help entry for {}", e);
    }
}

#[test]
fn every_documented_raid_command_parses() {
    for name in all_command_names().into_iter().filter(|n| *n != "help") {
        assert!(
            RaidCommand::from_name(name).is_some(),
            "{} is documented but not routable",
            name
        );
    }
}
