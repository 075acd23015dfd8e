//! Unit tests for the XML reader.

use super::*;
use osmflow_core::test_support::{Event, RecordingHandler, empty_pass};
use osmflow_core::{Member, OsmObject};
use rstest::{fixture, rstest};

const SCENARIO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<osm version="0.6">
  <bounds minlon="1" minlat="1" maxlon="2" maxlat="2"/>
  <node id="1" lon="7.0" lat="52.0">
    <tag k="name" v="Foo"/>
  </node>
  <way id="2">
    <nd ref="1"/>
    <nd ref="1"/>
  </way>
  <relation id="3">
    <member type="way" ref="2" role=""/>
  </relation>
</osm>
"#;

#[fixture]
fn handler() -> RecordingHandler {
    RecordingHandler::new()
}

fn parse(
    document: &str,
    handler: &mut RecordingHandler,
    tag_policy: TagPolicy,
) -> Result<ReadOutcome, ReadError> {
    let mut source = TrackingReader::new(document.as_bytes(), 64);
    read(&mut source, handler, tag_policy)
}

#[rstest]
fn scenario_produces_ordered_call_sequence(mut handler: RecordingHandler) {
    let outcome = parse(SCENARIO, &mut handler, TagPolicy::Lenient).expect("valid document");
    assert!(outcome.completed);
    assert_eq!(
        handler.events(),
        vec![
            Event::BeforePoints,
            Event::Point(1),
            Event::AfterPoints,
            Event::BeforeWays,
            Event::Way(2),
            Event::AfterWays,
            Event::BeforeRelations,
            Event::Relation(3),
            Event::AfterRelations,
            Event::Finished,
        ]
    );

    let point = &handler.points[0];
    assert_eq!(point.position, Some(Position::from_degrees(7.0, 52.0)));
    assert_eq!(point.tags().get("name"), Some("Foo"));
    assert_eq!(handler.ways[0].nodes, vec![1, 1]);
    assert_eq!(
        handler.relations[0].members,
        vec![Member {
            kind: ObjectKind::Way,
            reference: 2,
            role: String::new(),
        }]
    );
    assert_eq!(outcome.bounds.min(), Some(Position::from_degrees(1.0, 1.0)));
    assert_eq!(outcome.bounds.max(), Some(Position::from_degrees(2.0, 2.0)));
}

#[rstest]
fn repeated_passes_are_identical() {
    let mut first = RecordingHandler::new();
    let mut second = RecordingHandler::new();
    parse(SCENARIO, &mut first, TagPolicy::Lenient).expect("valid document");
    parse(SCENARIO, &mut second, TagPolicy::Lenient).expect("valid document");
    assert_eq!(first.events(), second.events());
    assert_eq!(first.points, second.points);
}

#[rstest]
fn empty_root_brackets_every_kind(mut handler: RecordingHandler) {
    parse("<osm/>", &mut handler, TagPolicy::Lenient).expect("valid document");
    assert_eq!(handler.events(), empty_pass());
}

#[rstest]
fn reads_metadata_and_keeps_unknown_attributes(mut handler: RecordingHandler) {
    let document = r#"<osm><node id="-5" version="3" visible="true" uid="31337"
        user="haxor" changeset="42" timestamp="2012-01-01T00:00:00Z"
        lon="1.5" lat="-2.25" colour="green"/></osm>"#;
    parse(document, &mut handler, TagPolicy::Lenient).expect("valid document");
    let meta = &handler.points[0].meta;
    assert_eq!(meta.id, -5);
    assert_eq!(meta.version, 3);
    assert_eq!(meta.uid, 31337);
    assert_eq!(meta.user, "haxor");
    assert_eq!(meta.changeset, 42);
    assert_eq!(meta.timestamp, 1_325_376_000);
    assert_eq!(meta.attribute("colour"), Some("green"));
    assert_eq!(
        handler.points[0].position,
        Some(Position::from_degrees(1.5, -2.25))
    );
}

#[rstest]
fn coordinates_on_ways_are_kept_verbatim(mut handler: RecordingHandler) {
    let document = r#"<osm><way id="2" lon="1" lat="2"/></osm>"#;
    parse(document, &mut handler, TagPolicy::Lenient).expect("valid document");
    let meta = &handler.ways[0].meta;
    assert_eq!(meta.attribute("lon"), Some("1"));
    assert_eq!(meta.attribute("lat"), Some("2"));
}

#[rstest]
fn objects_inside_delete_are_invisible(mut handler: RecordingHandler) {
    let document = r#"<osmChange version="0.6">
      <modify><node id="1" lon="0" lat="0"/></modify>
      <delete><node id="2" lon="0" lat="0" visible="true"/><node id="3"/></delete>
      <create><way id="4"/></create>
    </osmChange>"#;
    parse(document, &mut handler, TagPolicy::Lenient).expect("valid document");
    let visibility: Vec<(i64, bool)> = handler
        .points
        .iter()
        .map(|point| (point.meta.id, point.meta.visible))
        .collect();
    assert_eq!(visibility, [(1, true), (2, false), (3, false)]);
    assert_eq!(handler.points[2].position, None);
    assert!(handler.ways[0].meta.visible, "flag resets after </delete>");
}

#[rstest]
fn empty_delete_wrapper_changes_nothing(mut handler: RecordingHandler) {
    let document = r#"<osmChange><delete/><node id="1"/></osmChange>"#;
    parse(document, &mut handler, TagPolicy::Lenient).expect("valid document");
    assert!(handler.points[0].meta.visible);
}

#[rstest]
#[case(r#"<tag v="x"/>"#, "", "x")]
#[case(r#"<tag k="x"/>"#, "x", "")]
#[case(r#"<tag/>"#, "", "")]
fn lenient_tags_default_to_empty(
    mut handler: RecordingHandler,
    #[case] tag: &str,
    #[case] key: &str,
    #[case] value: &str,
) {
    let document = format!(r#"<osm><node id="1">{tag}</node></osm>"#);
    parse(&document, &mut handler, TagPolicy::Lenient).expect("lenient policy accepts it");
    assert_eq!(handler.points[0].tags().iter().collect::<Vec<_>>(), [(key, value)]);
}

#[rstest]
fn strict_tags_require_key_and_value(mut handler: RecordingHandler) {
    let document = "<osm>\n<node id=\"1\">\n<tag k=\"x\"/></node></osm>";
    let error = parse(document, &mut handler, TagPolicy::Strict).expect_err("strict policy");
    match error {
        ReadError::MalformedTag { line, .. } => assert_eq!(line, 3),
        other => panic!("expected malformed tag, got {other:?}"),
    }
    assert!(handler.points.is_empty());
    assert_eq!(handler.events().last(), Some(&Event::Finished));
}

#[rstest]
fn duplicate_tag_keys_are_kept(mut handler: RecordingHandler) {
    let document = r#"<osm><node id="1"><tag k="a" v="1"/><tag k="a" v="2"/></node></osm>"#;
    parse(document, &mut handler, TagPolicy::Lenient).expect("valid document");
    assert_eq!(handler.points[0].tags().len(), 2);
    assert_eq!(handler.points[0].tags().get("a"), Some("1"));
}

#[rstest]
fn misplaced_children_are_ignored(mut handler: RecordingHandler) {
    let document = r#"<osm>
      <node id="1"><nd ref="9"/><member type="node" ref="9"/></node>
      <way id="2"><member type="node" ref="9"/></way>
    </osm>"#;
    parse(document, &mut handler, TagPolicy::Lenient).expect("misplaced children are tolerated");
    assert!(handler.ways[0].nodes.is_empty());
}

#[rstest]
fn long_role_fails_the_pass(mut handler: RecordingHandler) {
    let role = "r".repeat(256);
    let document = format!(
        r#"<osm><relation id="7"><member type="node" ref="1" role="{role}"/></relation><relation id="8"/></osm>"#
    );
    let error = parse(&document, &mut handler, TagPolicy::Lenient).expect_err("role is too long");
    match error {
        ReadError::RoleTooLong { id, length, max } => {
            assert_eq!((id, length, max), (7, 256, 255));
        }
        other => panic!("expected role too long, got {other:?}"),
    }
    assert!(handler.relations.is_empty(), "no further per-object calls");
    assert_eq!(
        handler.events(),
        vec![
            Event::BeforePoints,
            Event::AfterPoints,
            Event::BeforeWays,
            Event::AfterWays,
            Event::BeforeRelations,
            Event::Finished,
        ]
    );
}

#[rstest]
#[case(r#"<member ref="1"/>"#, "missing type")]
#[case(r#"<member type="area" ref="1"/>"#, "unknown type")]
#[case(r#"<member type="node"/>"#, "missing ref")]
fn malformed_members_fail_the_pass(
    mut handler: RecordingHandler,
    #[case] member: &str,
    #[case] expected: &str,
) {
    let document = format!(r#"<osm><relation id="3">{member}</relation></osm>"#);
    let error = parse(&document, &mut handler, TagPolicy::Lenient).expect_err("malformed member");
    match error {
        ReadError::MalformedMember { id, detail, .. } => {
            assert_eq!(id, 3);
            assert!(detail.starts_with(expected), "unexpected detail {detail:?}");
        }
        other => panic!("expected malformed member, got {other:?}"),
    }
    assert_eq!(handler.log().finished_count(), 1);
}

#[rstest]
#[case("<osm><node id=\"1\"></osm>")]
#[case("<osm><node id=\"1\">")]
#[case("")]
#[case("<osm><node id=\"1\" lat=\"1\" lat=\"2\"/></osm>")]
fn malformed_syntax_fails_the_pass(mut handler: RecordingHandler, #[case] document: &str) {
    let error = parse(document, &mut handler, TagPolicy::Lenient).expect_err("bad syntax");
    assert!(matches!(error, ReadError::Syntax { .. }), "got {error:?}");
    assert_eq!(handler.events().last(), Some(&Event::Finished));
    assert_eq!(handler.log().finished_count(), 1);
}

#[rstest]
fn nested_objects_are_a_syntax_error(mut handler: RecordingHandler) {
    let document = r#"<osm><way id="1"><node id="2"/></way></osm>"#;
    let error = parse(document, &mut handler, TagPolicy::Lenient).expect_err("nested objects");
    match error {
        ReadError::Syntax { message, .. } => assert_eq!(message, "<node> nested inside <way>"),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[rstest]
#[case(r#"<node id="x"/>"#, "id")]
#[case(r#"<node id="1" version="-1"/>"#, "version")]
#[case(r#"<node id="1" visible="no"/>"#, "visible")]
#[case(r#"<node id="1" timestamp="yesterday"/>"#, "timestamp")]
#[case(r#"<node id="1" lat="north"/>"#, "lat")]
#[case(r#"<node id="1" lon="NaN" lat="52"/>"#, "lon")]
#[case(r#"<node id="1" lon="7" lat="1e12"/>"#, "lat")]
#[case(r#"<bounds minlon="inf" minlat="0" maxlon="1" maxlat="1"/>"#, "minlon")]
fn invalid_values_fail_the_pass(
    mut handler: RecordingHandler,
    #[case] element: &str,
    #[case] expected: &str,
) {
    let document = format!("<osm>{element}</osm>");
    let error = parse(&document, &mut handler, TagPolicy::Lenient).expect_err("invalid value");
    match error {
        ReadError::InvalidValue { attribute, .. } => assert_eq!(attribute, expected),
        other => panic!("expected invalid value, got {other:?}"),
    }
}

#[rstest]
fn missing_identifier_fails_the_pass(mut handler: RecordingHandler) {
    let error = parse(r#"<osm><way version="1"/></osm>"#, &mut handler, TagPolicy::Lenient)
        .expect_err("ways need an id");
    assert!(matches!(
        error,
        ReadError::MissingIdentifier {
            kind: ObjectKind::Way,
            ..
        }
    ));
}

#[rstest]
fn change_blocks_reopen_sections(mut handler: RecordingHandler) {
    let document = r#"<osmChange version="0.6">
  <create>
    <node id="1" lon="7.0" lat="52.0"/>
    <way id="2"><nd ref="1"/></way>
  </create>
  <modify>
    <node id="3" lon="7.1" lat="52.1"/>
  </modify>
  <delete>
    <relation id="4"><member type="node" ref="3" role=""/></relation>
  </delete>
</osmChange>"#;
    let outcome = parse(document, &mut handler, TagPolicy::Lenient).expect("valid change file");
    assert!(outcome.completed);
    assert_eq!(
        handler.events(),
        vec![
            Event::BeforePoints,
            Event::Point(1),
            Event::AfterPoints,
            Event::BeforeWays,
            Event::Way(2),
            Event::AfterWays,
            Event::BeforePoints,
            Event::Point(3),
            Event::AfterPoints,
            Event::BeforeRelations,
            Event::Relation(4),
            Event::AfterRelations,
            Event::Finished,
        ]
    );
    assert!(!handler.relations[0].meta.visible);
}

#[rstest]
fn trailing_point_after_ways_closes_its_own_section(mut handler: RecordingHandler) {
    let document = r#"<osm><way id="2"/><node id="1"/></osm>"#;
    parse(document, &mut handler, TagPolicy::Lenient).expect("kinds may return");
    assert_eq!(
        handler.events(),
        vec![
            Event::BeforePoints,
            Event::AfterPoints,
            Event::BeforeWays,
            Event::Way(2),
            Event::AfterWays,
            Event::BeforePoints,
            Event::Point(1),
            Event::AfterPoints,
            Event::BeforeRelations,
            Event::AfterRelations,
            Event::Finished,
        ]
    );
}

#[rstest]
fn stop_skips_remaining_objects(handler: RecordingHandler) {
    let mut handler = handler.stop_after(1);
    let outcome = parse(SCENARIO, &mut handler, TagPolicy::Lenient).expect("stopping succeeds");
    assert!(!outcome.completed);
    assert_eq!(
        handler.events(),
        vec![
            Event::BeforePoints,
            Event::Point(1),
            Event::AfterPoints,
            Event::Finished,
        ]
    );
}

#[rstest]
fn incomplete_bounds_are_ignored(mut handler: RecordingHandler) {
    let document = r#"<osm><bounds minlon="0" minlat="0" maxlon="1"/></osm>"#;
    let outcome = parse(document, &mut handler, TagPolicy::Lenient).expect("valid document");
    assert!(!outcome.bounds.is_defined());
}

#[rstest]
fn bounds_accumulate_across_declarations(mut handler: RecordingHandler) {
    let document = r#"<osm>
      <bounds minlon="1" minlat="1" maxlon="2" maxlat="2"/>
      <bounds minlon="0" minlat="3" maxlon="0" maxlat="3"/>
    </osm>"#;
    let outcome = parse(document, &mut handler, TagPolicy::Lenient).expect("valid document");
    assert_eq!(outcome.bounds.min(), Some(Position::from_degrees(0.0, 1.0)));
    assert_eq!(outcome.bounds.max(), Some(Position::from_degrees(2.0, 3.0)));
}

#[rstest]
fn escaped_values_are_unescaped(mut handler: RecordingHandler) {
    let document = r#"<osm><node id="1"><tag k="name" v="Fish &amp; Chips"/></node></osm>"#;
    parse(document, &mut handler, TagPolicy::Lenient).expect("valid document");
    assert_eq!(handler.points[0].tags().get("name"), Some("Fish & Chips"));
}
