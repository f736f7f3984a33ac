use super::view::{FilterPredicate, SortKey, SortOrder, ViewState};

/// A change emitted by one of the user's view controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    SortKey(SortKey),
    SortOrder(SortOrder),
    Filter(FilterPredicate),
}

impl ViewState {
    /// Fold a control event into the view. Returns `true` if anything changed.
    pub fn apply_event(&mut self, event: ControlEvent) -> bool {
        match event {
            ControlEvent::SortKey(key) => replace(&mut self.sort_key, key),
            ControlEvent::SortOrder(order) => replace(&mut self.sort_order, order),
            ControlEvent::Filter(filter) => replace(&mut self.filter, filter),
        }
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}

/// The filter selector's options: `all`, then categories, then moods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterChoices {
    choices: Vec<FilterPredicate>,
}

impl Default for FilterChoices {
    fn default() -> Self {
        Self {
            choices: vec![FilterPredicate::All],
        }
    }
}

impl FilterChoices {
    pub fn new(categories: &[String], moods: &[String]) -> Self {
        let mut choices = vec![FilterPredicate::All];
        for category in categories {
            let choice = FilterPredicate::by_category(category);
            if !choices.contains(&choice) {
                choices.push(choice);
            }
        }
        choices.extend(moods.iter().map(|mood| FilterPredicate::by_mood(mood)));
        Self { choices }
    }

    #[cfg(test)]
    pub fn as_slice(&self) -> &[FilterPredicate] {
        &self.choices
    }

    /// The choice after `current`, wrapping. Unknown `current` starts over at `all`.
    pub fn after(&self, current: &FilterPredicate) -> FilterPredicate {
        match self.choices.iter().position(|c| c == current) {
            Some(pos) => self.choices[(pos + 1) % self.choices.len()].clone(),
            None => FilterPredicate::All,
        }
    }

    /// The choice before `current`, wrapping.
    pub fn before(&self, current: &FilterPredicate) -> FilterPredicate {
        let len = self.choices.len();
        match self.choices.iter().position(|c| c == current) {
            Some(pos) => self.choices[(pos + len - 1) % len].clone(),
            None => FilterPredicate::All,
        }
    }
}
