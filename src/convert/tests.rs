use std::fmt::Write as _;
use std::io::Read;
use std::path::Path;

use tempfile::tempdir;

use super::{
    DEFAULT_STREAM_CAPACITY, HeaderLayout, JtlField, TextExporter, TextStream, binary_to_text,
    text_to_binary,
};
use crate::codec::{SampleLog, StatusKind, UNKNOWN_BYTES};
use crate::error::ConvertError;

const FULL_LOG: &str = "\
timeStamp,elapsed,label,responseCode,responseMessage,threadName,dataType,success,failureMessage,bytes,sentBytes,grpThreads,allThreads,URL,Latency,IdleTime,Connect
1500000015000,31,search,200,OK,Thread Group 1-2,text,true,,2048,110,2,2,http://localhost/search,30,0,3
1500000000000,120,login,200,OK,Thread Group 1-1,text,true,,512,120,1,1,http://localhost/login,100,0,12
1500000090000,7,search,503,Service Unavailable,Thread Group 1-1,text,false,boom,0,110,2,2,http://localhost/search,7,0,1
1500000030000,45,\"login, again\",599,Custom Thing,Thread Group 1-2,text,true,,512,120,2,2,http://localhost/login,40,0,2
";

fn write_file(dir: &Path, name: &str, content: &str) -> Result<std::path::PathBuf, String> {
    let path = dir.join(name);
    std::fs::write(&path, content).map_err(|err| format!("write failed: {}", err))?;
    Ok(path)
}

#[test]
fn quoted_fields_survive_conversion() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let source = write_file(
        dir.path(),
        "quoted.jtl",
        "timeStamp,elapsed,label,responseMessage\r\n\r\n1000,5,\"a,b\",\"say \"\"hi\"\"\"\r\n1001,6,\"multi\nline\",\r\n",
    )?;
    let bin = dir.path().join("quoted.lls");
    text_to_binary(&source, &bin).map_err(|err| err.to_string())?;
    let log = SampleLog::read(&bin).map_err(|err| err.to_string())?;
    if log.labels() != ["a,b", "multi\nline"] {
        return Err(format!("Unexpected labels: {:?}", log.labels()));
    }

    let exporter = TextExporter::open(&bin).map_err(|err| err.to_string())?;
    let mut out = Vec::new();
    exporter.write_to(&mut out).map_err(|err| err.to_string())?;
    let expected = "timeStamp,elapsed,label,responseCode,responseMessage,success\n\
                    1000,5,\"a,b\",,\"say \"\"hi\"\"\",true\n\
                    1001,6,\"multi\nline\",,,true\n";
    if out != expected.as_bytes() {
        return Err(format!("Unexpected text: {:?}", String::from_utf8_lossy(&out)));
    }
    Ok(())
}

#[test]
fn header_names_match_case_insensitively() -> Result<(), String> {
    if JtlField::from_header("TIMESTAMP") != Some(JtlField::TimeStamp)
        || JtlField::from_header("url") != Some(JtlField::Url)
        || JtlField::from_header("nope").is_some()
    {
        return Err("Header lookup failed".to_owned());
    }
    let header = ["timestamp", "Elapsed", "LABEL", "custom"].map(str::to_owned);
    match HeaderLayout::detect(&header) {
        HeaderLayout::Named(columns) if columns.get(3) == Some(&None) => Ok(()),
        other => Err(format!("Expected a named header, got {:?}", other)),
    }
}

#[test]
fn headerless_default_layout_is_detected() -> Result<(), String> {
    let row = "1500000000000,12,home,200,OK,Thread 1-1,text,TRUE,100,1,1,10"
        .split(',')
        .map(str::to_owned)
        .collect::<Vec<_>>();
    match HeaderLayout::detect(&row) {
        HeaderLayout::Headerless(columns) if columns.len() == 12 => {}
        other => return Err(format!("Expected headerless layout, got {:?}", other)),
    }
    let mut broken = row;
    if let Some(cell) = broken.get_mut(7) {
        *cell = "maybe".to_owned();
    }
    if HeaderLayout::detect(&broken) != HeaderLayout::Unrecognized {
        return Err("Non-boolean success column should be rejected".to_owned());
    }
    Ok(())
}

#[test]
fn text_to_binary_sorts_and_encodes() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let source = write_file(dir.path(), "run.jtl", FULL_LOG)?;
    let dest = dir.path().join("run.lls");
    let summary = text_to_binary(&source, &dest).map_err(|err| err.to_string())?;
    if summary.rows != 4
        || summary.earliest_millis != 1_500_000_000_000
        || summary.latest_millis != 1_500_000_090_007
    {
        return Err(format!("Unexpected summary: {:?}", summary));
    }

    let log = SampleLog::read(&dest).map_err(|err| err.to_string())?;
    let offsets: Vec<i64> = log.samples().iter().map(|s| s.offset_millis).collect();
    if offsets != vec![0, 15_000, 30_000, 90_000] {
        return Err(format!("Unexpected offsets: {:?}", offsets));
    }
    if log.labels() != ["login", "search", "login, again"] {
        return Err(format!("Unexpected labels: {:?}", log.labels()));
    }
    let last = log.samples().last().ok_or("missing sample")?;
    if last.success || last.response_bytes != 0 || last.total_threads != 2 {
        return Err(format!("Unexpected last sample: {:?}", last));
    }
    let custom = log.samples().get(2).ok_or("missing sample")?.status_ref;
    if custom.kind() != StatusKind::Custom(0) {
        return Err(format!("Unexpected custom status: {:?}", custom));
    }
    let message = log.status_message(custom).map_err(|err| err.to_string())?;
    if message != "Custom Thing" {
        return Err(format!("Unexpected custom message: {}", message));
    }
    if log.dictionaries().codes.as_deref() != Some(&["599".to_owned()][..]) {
        return Err("Only the custom pair should land in the dictionary".to_owned());
    }
    Ok(())
}

#[test]
fn optional_columns_default_when_absent() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let source = write_file(
        dir.path(),
        "min.csv",
        "timeStamp,elapsed,success\n1000,5,\n1010,6,FALSE\n",
    )?;
    let dest = dir.path().join("min.lls");
    text_to_binary(&source, &dest).map_err(|err| err.to_string())?;
    let log = SampleLog::read(&dest).map_err(|err| err.to_string())?;
    let [first, second] = log.samples() else {
        return Err("Expected two samples".to_owned());
    };
    if !first.success || second.success {
        return Err("Absent success should default to true".to_owned());
    }
    if first.response_bytes != UNKNOWN_BYTES || first.total_threads != 0 || first.label_ref != 0 {
        return Err(format!("Unexpected defaults: {:?}", first));
    }
    if log.dictionaries().labels.is_some() || log.dictionaries().codes.is_some() {
        return Err("No dictionaries expected".to_owned());
    }
    Ok(())
}

#[test]
fn header_only_log_has_no_rows() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let source = write_file(dir.path(), "empty.jtl", "timeStamp,elapsed,label\n")?;
    let summary =
        text_to_binary(&source, &dir.path().join("empty.lls")).map_err(|err| err.to_string())?;
    if summary.rows != 0 || summary.earliest_millis != 0 || summary.latest_millis != 0 {
        return Err(format!("Unexpected summary: {:?}", summary));
    }
    Ok(())
}

#[test]
fn malformed_logs_are_rejected_without_output() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let dest = dir.path().join("out.lls");
    let cases = [
        ("empty.jtl", ""),
        ("nostamp.jtl", "elapsed,label,success\n5,a,true\n"),
        ("width.jtl", "timeStamp,elapsed\n1000,5,extra\n"),
        ("number.jtl", "timeStamp,elapsed\n1000,five\n"),
        ("blank.jtl", "timeStamp,elapsed\n,5\n"),
        ("garbage.jtl", "what,is,this\n1,2,3\n"),
    ];
    for (name, content) in cases {
        let source = write_file(dir.path(), name, content)?;
        let result = text_to_binary(&source, &dest);
        let matched = matches!(
            (name, &result),
            ("empty.jtl", Err(ConvertError::EmptySource { .. }))
                | ("nostamp.jtl", Err(ConvertError::MissingColumn { column: "timeStamp" }))
                | (
                    "width.jtl",
                    Err(ConvertError::ColumnCount {
                        row: 2,
                        expected: 2,
                        found: 3
                    })
                )
                | ("number.jtl", Err(ConvertError::InvalidNumber { row: 2, .. }))
                | ("blank.jtl", Err(ConvertError::EmptyValue { row: 2, .. }))
                | ("garbage.jtl", Err(ConvertError::UnrecognizedHeader { .. }))
        );
        if !matched {
            return Err(format!("{}: unexpected result {:?}", name, result));
        }
        if dest.exists() {
            return Err(format!("{}: output written for a rejected log", name));
        }
    }
    Ok(())
}

#[test]
fn text_round_trip_is_stable() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let source = write_file(dir.path(), "run.jtl", FULL_LOG)?;
    let first_bin = dir.path().join("first.lls");
    let first_text = dir.path().join("first.csv");
    let second_bin = dir.path().join("second.lls");
    let second_text = dir.path().join("second.csv");

    text_to_binary(&source, &first_bin).map_err(|err| err.to_string())?;
    let first = binary_to_text(&first_bin, &first_text).map_err(|err| err.to_string())?;
    text_to_binary(&first_text, &second_bin).map_err(|err| err.to_string())?;
    let second = binary_to_text(&second_bin, &second_text).map_err(|err| err.to_string())?;

    if first.sha256 != second.sha256 {
        return Err("Second export differs from the first".to_owned());
    }
    let text = std::fs::read_to_string(&first_text).map_err(|err| err.to_string())?;
    let mut lines = text.lines();
    let header = lines.next().ok_or("missing header")?;
    if header != "timeStamp,elapsed,label,responseCode,responseMessage,threadName,success,bytes,allThreads,URL" {
        return Err(format!("Unexpected header: {}", header));
    }
    let row = lines.nth(2).ok_or("missing row")?;
    if row != "1500000030000,45,\"login, again\",599,Custom Thing,Thread Group 1-2,true,512,2,http://localhost/login" {
        return Err(format!("Unexpected row: {}", row));
    }
    Ok(())
}

#[test]
fn exporter_only_writes_used_columns() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let source = write_file(
        dir.path(),
        "min.csv",
        "timeStamp,elapsed,label,bytes\n1000,5,home,\n1010,6,home,-1\n",
    )?;
    let dest = dir.path().join("min.lls");
    text_to_binary(&source, &dest).map_err(|err| err.to_string())?;
    let exporter = TextExporter::open(&dest).map_err(|err| err.to_string())?;
    let mut out = Vec::new();
    exporter.write_to(&mut out).map_err(|err| err.to_string())?;
    if out != b"timeStamp,elapsed,label,success\n1000,5,home,true\n1010,6,home,true\n" {
        return Err(format!("Unexpected text: {}", String::from_utf8_lossy(&out)));
    }
    Ok(())
}

#[test]
fn headerless_log_converts() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let source = write_file(
        dir.path(),
        "bare.jtl",
        "1000,12,home,200,OK,T 1-1,text,true,100,1,1,10\n1005,3,home,404,Not Found,T 1-1,text,false,20,1,1,3\n",
    )?;
    let dest = dir.path().join("bare.lls");
    let summary = text_to_binary(&source, &dest).map_err(|err| err.to_string())?;
    if summary.rows != 2 || summary.latest_millis != 1012 {
        return Err(format!("Unexpected summary: {:?}", summary));
    }
    Ok(())
}

#[test]
fn text_stream_matches_file_export() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let source = write_file(dir.path(), "run.jtl", FULL_LOG)?;
    let bin = dir.path().join("run.lls");
    let text = dir.path().join("run.csv");
    text_to_binary(&source, &bin).map_err(|err| err.to_string())?;
    binary_to_text(&bin, &text).map_err(|err| err.to_string())?;
    let expected = std::fs::read(&text).map_err(|err| err.to_string())?;

    let exporter = TextExporter::open(&bin).map_err(|err| err.to_string())?;
    let mut stream = TextStream::spawn(exporter, 1).map_err(|err| err.to_string())?;
    let mut streamed = Vec::new();
    stream
        .read_to_end(&mut streamed)
        .map_err(|err| err.to_string())?;
    if streamed != expected {
        return Err("Streamed text differs from the file export".to_owned());
    }

    let exporter = TextExporter::open(&bin).map_err(|err| err.to_string())?;
    let chunks = TextStream::spawn(exporter, DEFAULT_STREAM_CAPACITY)
        .map_err(|err| err.to_string())?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| err.to_string())?;
    if chunks.concat() != expected {
        return Err("Chunked text differs from the file export".to_owned());
    }
    Ok(())
}

#[test]
fn dropping_a_stream_stops_the_producer() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let mut content = String::from("timeStamp,elapsed,label\n");
    for idx in 0..20_000 {
        writeln!(content, "{},{},label-{}", 1_000 + idx, idx % 97, idx % 13)
            .map_err(|err| err.to_string())?;
    }
    let source = write_file(dir.path(), "big.jtl", &content)?;
    let bin = dir.path().join("big.lls");
    text_to_binary(&source, &bin).map_err(|err| err.to_string())?;

    let exporter = TextExporter::open(&bin).map_err(|err| err.to_string())?;
    let mut stream = TextStream::spawn(exporter, 1).map_err(|err| err.to_string())?;
    let mut head = [0u8; 16];
    stream.read_exact(&mut head).map_err(|err| err.to_string())?;
    if &head != b"timeStamp,elapse" {
        return Err(format!("Unexpected head: {:?}", head));
    }
    drop(stream);
    Ok(())
}

#[test]
fn producer_failures_reach_the_reader() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let source = write_file(dir.path(), "run.jtl", FULL_LOG)?;
    let bin = dir.path().join("run.lls");
    text_to_binary(&source, &bin).map_err(|err| err.to_string())?;

    let exporter = TextExporter::open(&bin).map_err(|err| err.to_string())?;
    let bytes = std::fs::read(&bin).map_err(|err| err.to_string())?;
    let truncated = bytes.get(..bytes.len().saturating_sub(3)).ok_or("empty sample file")?;
    std::fs::write(&bin, truncated).map_err(|err| err.to_string())?;

    let mut stream = TextStream::spawn(exporter, 1).map_err(|err| err.to_string())?;
    let mut streamed = Vec::new();
    match stream.read_to_end(&mut streamed) {
        Err(err) if err.to_string().contains("truncated") => Ok(()),
        other => Err(format!("Expected a truncation error, got {:?}", other)),
    }
}
