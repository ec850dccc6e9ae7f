/* Saving and loading DFAs as JSON. A DFA is stored as the five lists it is built from; loading
 * goes through Dfa::new so a malformed file is rejected instead of minimized. */

use crate::dfa::{Dfa, DfaError};
use crate::fa::Label;
use color_eyre::eyre::{Result, WrapErr};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DfaDescription<Q, A> {
    pub states: Vec<Q>,
    pub alphabet: Vec<A>,
    pub transitions: Vec<(Q, A, Q)>, // (from, symbol, to)
    pub start: Q,
    #[serde(default = "Vec::new")]
    pub accepting: Vec<Q>,
}

impl<Q: Label, A: Label> From<&Dfa<Q, A>> for DfaDescription<Q, A> {
    fn from(dfa: &Dfa<Q, A>) -> Self {
        DfaDescription {
            states: dfa.states().iter().cloned().collect(),
            alphabet: dfa.alphabet().iter().cloned().collect(),
            transitions: dfa
                .transitions()
                .map(|(from, symbol, to)| (from.clone(), symbol.clone(), to.clone()))
                .collect(),
            start: dfa.start().clone(),
            accepting: dfa.accepting().iter().cloned().collect(),
        }
    }
}

impl<Q: Label, A: Label> TryFrom<DfaDescription<Q, A>> for Dfa<Q, A> {
    type Error = DfaError;

    fn try_from(description: DfaDescription<Q, A>) -> Result<Self, DfaError> {
        Dfa::new(
            description.states,
            description.alphabet,
            description.transitions,
            description.start,
            description.accepting,
        )
    }
}

/// Save the DFA as pretty printed JSON
pub fn save_dfa<Q, A>(dfa: &Dfa<Q, A>, file_name: impl AsRef<Path>) -> Result<()>
where
    Q: Label + Serialize,
    A: Label + Serialize,
{
    let file_name = file_name.as_ref();
    let file = File::create(file_name)
        .wrap_err_with(|| format!("Failed to create {}", file_name.display()))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &DfaDescription::from(dfa))?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}

/// Load a DFA from a saved JSON file
pub fn load_dfa<Q, A>(file_name: impl AsRef<Path>) -> Result<Dfa<Q, A>>
where
    Q: Label + DeserializeOwned,
    A: Label + DeserializeOwned,
{
    let file_name = file_name.as_ref();
    let file = File::open(file_name)
        .wrap_err_with(|| format!("Failed to open {}", file_name.display()))?;

    let buf_reader = BufReader::new(file);

    let description: DfaDescription<Q, A> = serde_json::from_reader(buf_reader)
        .wrap_err_with(|| format!("Malformed DFA description in {}", file_name.display()))?;

    let dfa = Dfa::try_from(description)?;
    Ok(dfa)
}
