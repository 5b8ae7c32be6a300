use std::fmt::Display;

use crate::substitution_models::FreqVector;

/// GTR-shaped exchangeability parameters, shared by all DNA models.
#[derive(Clone, Debug, PartialEq)]
pub struct DNASubstParams {
    pub(crate) pi: FreqVector,
    pub(crate) rtc: f64,
    pub(crate) rta: f64,
    pub(crate) rtg: f64,
    pub(crate) rca: f64,
    pub(crate) rcg: f64,
    pub(crate) rag: f64,
}

impl Display for DNASubstParams {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[pi = {:?}, rtc = {}, rta = {}, rtg = {}, rca = {}, rcg = {}, rag = {}]",
            self.pi.as_slice(),
            self.rtc,
            self.rta,
            self.rtg,
            self.rca,
            self.rcg,
            self.rag
        )
    }
}

impl DNASubstParams {
    pub(crate) fn print_as_k80(&self) -> String {
        debug_assert!(
            self.rtc == self.rag
                && self.rta == self.rtg
                && self.rta == self.rca
                && self.rta == self.rcg
        );
        format!("[alpha = {}, beta = {}]", self.rtc, self.rta)
    }

    pub(crate) fn print_as_hky(&self) -> String {
        debug_assert!(
            self.rtc == self.rag
                && self.rta == self.rtg
                && self.rta == self.rca
                && self.rta == self.rcg
        );
        format!(
            "[pi = {:?}, kappa = {}]",
            self.pi.as_slice(),
            self.rtc / self.rta
        )
    }

    pub(crate) fn print_as_tn93(&self) -> String {
        debug_assert!(self.rta == self.rtg && self.rta == self.rca && self.rta == self.rcg);
        format!(
            "[pi = {:?}, alpha1 = {}, alpha2 = {}, beta = {}]",
            self.pi.as_slice(),
            self.rtc,
            self.rag,
            self.rta
        )
    }

    pub(crate) fn print_as_gtr(&self) -> String {
        format!("{}", self)
    }
}
