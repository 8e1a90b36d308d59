use pan2kql::translator::{MappingRule, MappingTable, TIME_FILTER_USAGE};
use pan2kql::{FormatError, Translator, translate};

#[test]
fn test_plain_text_is_unchanged() {
    for query in ["", "hello world", "( severity geq high )", "TimeGenerated > ago(1h)"] {
        assert_eq!(translate(query).unwrap(), query);
    }
}

#[test]
fn test_single_bound_standard_time() {
    assert_eq!(
        translate("time_generated geq '2023/01/10 00:00:00'").unwrap(),
        "TimeGenerated >= todatetime('2023-01-10 08:00:00')"
    );
}

#[test]
fn test_range_in_daylight_saving_time() {
    assert_eq!(
        translate(
            "( time_generated geq '2023/06/01 00:00:00' ) and ( time_generated leq '2023/06/02 00:00:00' )"
        )
        .unwrap(),
        "TimeGenerated between(datetime('2023-06-01 07:00:00') .. datetime('2023-06-02 07:00:00'))"
    );
}

#[test]
fn test_unrelated_time_fields_are_rejected() {
    let err = translate(
        "( time_generated geq '2023/06/01 00:00:00' ) or ( receive_time leq '2023/06/02 00:00:00' )",
    )
    .unwrap_err();
    assert_eq!(err, FormatError::MalformedTimeFilter { occurrences: 2 });
    assert!(err.to_string().contains(TIME_FILTER_USAGE));
}

#[test]
fn test_invalid_timestamp_names_the_literal() {
    let err = translate("receive_time leq '2023/13/01 00:00:00'").unwrap_err();
    assert!(err.to_string().contains("2023/13/01 00:00:00"));
}

#[test]
fn test_leap_second_is_rejected() {
    let err = translate("time_generated geq '2023/01/10 00:00:60'").unwrap_err();
    assert!(matches!(err, FormatError::InvalidTimestamp { .. }));
    assert!(err.to_string().contains("2023/01/10 00:00:60"));
}

#[test]
fn test_empty_literal_is_kept() {
    assert_eq!(translate("( rule eq '' )").unwrap(), "( Rule == '' )");
}

#[test]
fn test_address_equality() {
    assert_eq!(
        translate("addr eq 10.0.0.1").unwrap(),
        "SourceIP == '10.0.0.1' or DestinationIP == '10.0.0.1'"
    );
}

#[test]
fn test_address_in_parenthesised_clause() {
    assert_eq!(
        translate("( addr in 10.0.0.1 ) and ( action eq allow )").unwrap(),
        "( SourceIP == '10.0.0.1' or DestinationIP == '10.0.0.1' ) and ( DeviceAction == 'allow' )"
    );
}

#[test]
fn test_address_cidr_inequality() {
    assert_eq!(
        translate("addr neq 10.0.0.0/24").unwrap(),
        "not(ipv4_is_match(SourceIP, '10.0.0.0/24') or ipv4_is_match(DestinationIP, '10.0.0.0/24'))"
    );
}

#[test]
fn test_address_cidr_equality() {
    assert_eq!(
        translate("( addr in 192.168.0.0/16 )").unwrap(),
        "( ipv4_is_match(SourceIP, '192.168.0.0/16') or ipv4_is_match(DestinationIP, '192.168.0.0/16') )"
    );
}

#[test]
fn test_directional_cidr() {
    assert_eq!(
        translate("( addr.src notin 10.0.0.0/8 )").unwrap(),
        "( not(ipv4_is_match(SourceIP, '10.0.0.0/8')) )"
    );
}

#[test]
fn test_port_is_numeric() {
    assert_eq!(translate("port.dst eq '443'").unwrap(), "DestinationPort == 443");
    assert_eq!(translate("( port.src eq 1024 )").unwrap(), "( SourcePort == 1024 )");
}

#[test]
fn test_down_level_logon_name() {
    assert_eq!(
        translate(r"user.src eq 'CONTOSO\jdoe'").unwrap(),
        r"SourceUserName == @'CONTOSO\jdoe'"
    );
}

#[test]
fn test_combined_filter() {
    let query = "( time_generated geq '2023/01/10 00:00:00' ) and ( time_generated leq '2023/01/11 00:00:00' ) and ( zone.src eq trust ) and ( app eq ssl ) and ( port.dst eq 443 )";
    assert_eq!(
        translate(query).unwrap(),
        "TimeGenerated between(datetime('2023-01-10 08:00:00') .. datetime('2023-01-11 08:00:00')) and ( SourceZone == 'trust' ) and ( ApplicationProtocol == 'ssl' ) and ( DestinationPort == 443 )"
    );
}

#[test]
fn test_translating_output_again_is_stable() {
    for query in [
        "addr eq 10.0.0.1",
        "addr neq 10.0.0.0/24",
        "port.dst eq '443'",
        r"user.src eq 'CONTOSO\jdoe'",
        "( rule eq 'outbound web' ) and ( action eq deny )",
    ] {
        let once = translate(query).unwrap();
        assert_eq!(translate(&once).unwrap(), once, "input: {query}");
    }
}

#[test]
fn test_custom_mapping_and_timezone() {
    let mut rules = pan2kql::translator::default_rules();
    rules.push(MappingRule::new("src_user_domain ", "SourceUserDomain "));
    let translator = Translator::with_parts(
        chrono_tz::America::New_York,
        MappingTable::new(rules).unwrap(),
    );

    assert_eq!(
        translator
            .translate("( src_user_domain eq corp ) and ( time_generated geq '2023/01/10 00:00:00' )")
            .unwrap(),
        "( SourceUserDomain == 'corp' ) and ( TimeGenerated >= todatetime('2023-01-10 05:00:00') )"
    );
}
