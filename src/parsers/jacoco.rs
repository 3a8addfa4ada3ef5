/// Parser for JaCoCo XML coverage reports.
///
/// JaCoCo XML structure:
///   <report name="...">
///     <sessioninfo id="..." start="..." dump="..."/>
///     <package name="com/example">
///       <class name="com/example/Foo" sourcefilename="Foo.java">
///         <method name="doStuff" desc="()V" line="10">
///           <counter type="INSTRUCTION" missed="0" covered="5"/>
///         </method>
///         <counter type="INSTRUCTION" missed="2" covered="10"/>
///       </class>
///       <sourcefile name="Foo.java">
///         <line nr="10" mi="0" ci="3" mb="0" cb="2"/>
///         <counter type="INSTRUCTION" missed="2" covered="10"/>
///         ...
///       </sourcefile>
///       <counter type="INSTRUCTION" missed="7" covered="15"/>
///     </package>
///     <counter type="INSTRUCTION" missed="10" covered="90"/>
///   </report>
///
/// Aggregation only consumes counters attached to the `<report>` itself and
/// to `<sourcefile>` elements. Counters nested in `<class>`, `<method>` or
/// at `<package>` level are skipped, as are `<line>` and `<sessioninfo>`
/// elements. Unknown counter `type` values are tolerated and skipped.
use std::io::BufRead;

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{get_attr, xml_err};
use crate::error::{CovprError, Result};
use crate::model::{CounterKind, CoverageCounter, PackageRecord, ReportModule, SourceFileRecord};

/// Parse a JaCoCo XML report from raw bytes into a [`ReportModule`].
pub fn parse(input: &[u8]) -> Result<ReportModule> {
    parse_reader(&mut &*input)
}

/// Streaming parse from any buffered reader.
pub fn parse_reader(reader: &mut dyn BufRead) -> Result<ReportModule> {
    let mut xml = Reader::from_reader(reader);
    let mut buf = Vec::new();

    let mut module = ReportModule::default();
    let mut found_report = false;

    // State tracking
    let mut current_package: Option<PackageRecord> = None;
    let mut current_sourcefile: Option<SourceFileRecord> = None;
    let mut class_depth: u32 = 0;

    loop {
        let event = xml.read_event_into(&mut buf);
        let is_start_event = matches!(&event, Ok(Event::Start(_)));
        match event {
            Err(e) => return Err(xml_err(e, &xml)),
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"report" => {
                    found_report = true;
                    module.name = get_attr(e, b"name").unwrap_or_default();
                }
                b"package" => {
                    current_package = Some(PackageRecord {
                        name: get_attr(e, b"name").unwrap_or_default(),
                        ..Default::default()
                    });
                }
                // <class> and <method> carry their own counters which the
                // aggregation never reads; track nesting to skip them.
                b"class" | b"method" if is_start_event => {
                    class_depth += 1;
                }
                b"sourcefile" => {
                    let record = SourceFileRecord {
                        name: get_attr(e, b"name").unwrap_or_default(),
                        ..Default::default()
                    };
                    if is_start_event {
                        current_sourcefile = Some(record);
                    } else if let Some(pkg) = current_package.as_mut() {
                        // Self-closing sourcefile: no counters to collect.
                        pkg.source_files.push(record);
                    }
                }
                b"counter" if class_depth == 0 => {
                    let kind = get_attr(e, b"type").and_then(|t| CounterKind::from_attr(&t));
                    if let Some(kind) = kind {
                        let missed = get_attr(e, b"missed")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0);
                        let covered = get_attr(e, b"covered")
                            .and_then(|v| v.parse().ok())
                            .unwrap_or(0);
                        let counter = CoverageCounter {
                            kind,
                            missed,
                            covered,
                        };
                        if let Some(file) = current_sourcefile.as_mut() {
                            file.counters.push(counter);
                        } else if current_package.is_none() && found_report {
                            module.counters.push(counter);
                        }
                        // Package-level counters are unused; drop them.
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"class" | b"method" => {
                    class_depth = class_depth.saturating_sub(1);
                }
                b"sourcefile" => {
                    if let Some(file) = current_sourcefile.take() {
                        if let Some(pkg) = current_package.as_mut() {
                            pkg.source_files.push(file);
                        }
                    }
                }
                b"package" => {
                    if let Some(pkg) = current_package.take() {
                        module.packages.push(pkg);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    if !found_report {
        return Err(CovprError::Parse(
            "no <report> element found in input".to_string(),
        ));
    }

    Ok(module)
}
