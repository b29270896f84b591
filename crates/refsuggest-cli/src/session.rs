use anyhow::{anyhow, Context, Result};
use refsuggest_core::controller::Key;
use refsuggest_core::locale::PartitionKey;
use refsuggest_core::traits::ReferenceRecord;
use refsuggest_core::widget::{ViewState, WidgetHandle};
use std::str::FromStr;
use std::time::Duration;

const SAMPLE_DELAY: Duration = Duration::from_millis(5);

/// One scripted UI action.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Focus,
    Blur,
    Type(String),
    Wait(Duration),
    Key(Key),
    Click(usize),
    Country(String),
    Partition(PartitionKey),
}

impl FromStr for Step {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let (verb, arg) = match s.split_once(':') {
            Some((verb, arg)) => (verb, Some(arg)),
            None => (s, None),
        };
        let need = |what: &str| arg.ok_or_else(|| anyhow!("step `{verb}` needs `{verb}:<{what}>`"));

        Ok(match verb.trim().to_ascii_lowercase().as_str() {
            "focus" => Step::Focus,
            "blur" => Step::Blur,
            "type" => Step::Type(need("text")?.to_owned()),
            "wait" => {
                let ms: u64 = need("ms")?.trim().parse().context("wait expects milliseconds")?;
                Step::Wait(Duration::from_millis(ms))
            }
            "click" => Step::Click(need("index")?.trim().parse().context("click expects an index")?),
            "country" => Step::Country(need("country")?.to_owned()),
            "partition" => Step::Partition(PartitionKey::new(need("key")?)),
            other => match other.parse::<Key>() {
                Ok(Key::Other) | Err(_) => return Err(anyhow!("unknown step `{s}`")),
                Ok(key) => Step::Key(key),
            },
        })
    }
}

pub fn parse_steps(raw: &[String]) -> Result<Vec<Step>> {
    raw.iter().map(|s| s.parse()).collect()
}

/// Replay `steps`, printing the view after each one.
pub async fn replay<R: ReferenceRecord>(handle: &WidgetHandle<R>, steps: &[Step]) {
    for step in steps {
        match step {
            Step::Focus => handle.focus().await,
            Step::Blur => handle.blur().await,
            Step::Type(text) => handle.input(text.clone()).await,
            Step::Wait(d) => tokio::time::sleep(*d).await,
            Step::Key(key) => {
                let outcome = handle.key(*key).await;
                println!(
                    "  key {key:?}: prevent_default={} committed={}",
                    outcome.prevent_default, outcome.committed
                );
            }
            Step::Click(i) => handle.click(*i).await,
            Step::Country(c) => handle.select_country(c.clone()).await,
            Step::Partition(p) => handle.select_partition(p.clone()).await,
        }
        // Give the widget task a moment to process the event before sampling.
        tokio::time::sleep(SAMPLE_DELAY).await;
        print_view(step, &handle.view());
    }
}

fn print_view<R: ReferenceRecord>(step: &Step, view: &ViewState<R>) {
    println!(
        "{step:?} -> text={:?} {:?} partition={} loading={} searches={}",
        view.text, view.dropdown, view.partition, view.loading, view.searches_run
    );
    for (i, rec) in view.suggestions.iter().enumerate() {
        let marker = if i as isize == view.active_index { '>' } else { ' ' };
        println!("  {marker} {}", rec.list_label());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_script_steps() {
        let steps = parse_steps(&[
            "focus".into(),
            "type:bo".into(),
            "wait:300".into(),
            "down".into(),
            "Enter".into(),
            "partition:Europe".into(),
        ])
        .unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Focus,
                Step::Type("bo".into()),
                Step::Wait(Duration::from_millis(300)),
                Step::Key(Key::ArrowDown),
                Step::Key(Key::Enter),
                Step::Partition(PartitionKey::from("europe")),
            ]
        );
    }

    #[test]
    fn rejects_unknown_and_incomplete_steps() {
        assert!("tab".parse::<Step>().is_err());
        assert!("type".parse::<Step>().is_err());
        assert!("wait:soon".parse::<Step>().is_err());
    }
}
