//! Fuzz target for composite object ID parsing.
//!
//! Parsing must never panic, and anything accepted must survive
//! formatting and parsing again unchanged.
//!
//! Run with:
//! cargo +nightly fuzz run fuzz_object_id_parsing -- -max_total_time=600

#![no_main]

use azuread_provider::ids::{parse_guid_pair, GroupOwnerId};
use libfuzzer_sys::fuzz_target;
use uuid::Uuid;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };

    if let Ok(id) = GroupOwnerId::parse(s) {
        assert!(!id.group_id().is_empty());
        assert!(!id.owner_id().is_empty());
        assert_eq!(id.to_string(), s);
        assert_eq!(GroupOwnerId::parse(&id.to_string()).unwrap(), id);
    }

    if let Ok((group, owner)) = parse_guid_pair(s) {
        let formatted = format!("{group}/{owner}");
        assert_eq!(parse_guid_pair(&formatted).unwrap(), (group, owner));

        let id = GroupOwnerId::parse_guids(s).unwrap();
        assert_eq!(Uuid::parse_str(id.group_id()).unwrap(), group);
        assert_eq!(id.to_string(), formatted);
    }
});
