//! The working context of known formulas

use super::formula::Formula;
use indexmap::IndexMap;

/// An ordered container of known formulas.
///
/// `formulas` keeps every formula in the order it was entered; `regular_forms`
/// maps each distinct regular form to the first formula entered with it, in
/// insertion order. One entry per equivalence class: for every formula in the
/// context, its regular form has an entry whose representative shares that
/// regular form.
///
/// Mutation happens only through `add`/`add_all`; the search meta-rule works
/// on an explicit clone and never mutates the caller's context.
#[derive(Debug, Clone, Default)]
pub struct FormulaContext {
    formulas: Vec<Formula>,
    regular_forms: IndexMap<Formula, Formula>,
}

impl FormulaContext {
    pub fn new() -> Self {
        FormulaContext::default()
    }

    pub fn from_formulas(formulas: impl IntoIterator<Item = Formula>) -> Self {
        let mut ctx = FormulaContext::new();
        ctx.add_all(formulas);
        ctx
    }

    pub fn add(&mut self, f: Formula) {
        let regular = f.regular_form();
        self.regular_forms.entry(regular).or_insert_with(|| f.clone());
        self.formulas.push(f);
    }

    pub fn add_all(&mut self, formulas: impl IntoIterator<Item = Formula>) {
        for f in formulas {
            self.add(f);
        }
    }

    /// Check membership by regular form
    pub fn contains(&self, regular: &Formula) -> bool {
        self.regular_forms.contains_key(regular)
    }

    /// The representative originally entered for a regular form
    pub fn representative(&self, regular: &Formula) -> Option<&Formula> {
        self.regular_forms.get(regular)
    }

    /// Formulas in the order they were entered
    pub fn formulas(&self) -> &[Formula] {
        &self.formulas
    }

    /// The regular-form table in insertion order
    pub fn regular_forms(&self) -> &IndexMap<Formula, Formula> {
        &self.regular_forms
    }

    /// Regular forms sorted by the formula order
    pub fn sorted_regular_forms(&self) -> Vec<&Formula> {
        let mut keys: Vec<&Formula> = self.regular_forms.keys().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.formulas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formulas.is_empty()
    }
}
