//! CSV view of an analysis result. Uses the `csv` crate for safe quoting.
//!
//! Format: `Date;Topic;Messages;Users`, one row per thread (semicolon-delimited).

use crate::domain::AnalysisResult;

pub fn result_to_csv(result: &AnalysisResult) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .from_writer(Vec::new());

    wtr.write_record(["Date", "Topic", "Messages", "Users"])?;

    for day in &result.days {
        for thread in &day.threads {
            let messages = thread.messages.to_string();
            let users = thread.users.to_string();
            wtr.write_record([
                day.date.as_str(),
                thread.topic.as_str(),
                messages.as_str(),
                users.as_str(),
            ])?;
        }
    }

    wtr.flush()?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(std::io::Error::other(e.to_string())))?;

    String::from_utf8(bytes).map_err(|e| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            e.to_string(),
        ))
    })
}
