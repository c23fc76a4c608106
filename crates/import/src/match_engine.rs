use std::collections::BTreeMap;

use jobledger_core::{JobRule, JobRuleSet, Transaction, TransactionError, UNCATEGORIZED};

/// Outcome of running one transaction through the rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification<'a> {
    Job(&'a JobRule),
    Unmatched,
}

impl<'a> Classification<'a> {
    /// Bucket this classification files into.
    pub fn bucket_name(&self) -> &'a str {
        match *self {
            Classification::Job(rule) => rule.name.as_str(),
            Classification::Unmatched => UNCATEGORIZED,
        }
    }
}

/// A rule paired with its patterns folded to lowercase.
struct CompiledJob<'a> {
    rule: &'a JobRule,
    vendor_patterns: Vec<String>,
    description_patterns: Vec<String>,
}

impl CompiledJob<'_> {
    /// Date-window and pattern test. Both pattern lists empty never matches.
    fn matches(&self, tx: &Transaction) -> Result<bool, TransactionError> {
        let date = tx.date.as_date()?;
        if !self.rule.active.contains(date) {
            return Ok(false);
        }

        Ok(contains_any(&tx.vendor, &self.vendor_patterns)
            || contains_any(&tx.description, &self.description_patterns))
    }
}

fn contains_any(text: &str, folded_patterns: &[String]) -> bool {
    if folded_patterns.is_empty() {
        return false;
    }
    let text = text.to_lowercase();
    folded_patterns.iter().any(|p| text.contains(p.as_str()))
}

/// First-match-wins classifier over a borrowed [`JobRuleSet`].
pub struct JobMatcher<'a> {
    jobs: Vec<CompiledJob<'a>>,
}

impl<'a> JobMatcher<'a> {
    pub fn new(rules: &'a JobRuleSet) -> Self {
        let fold = |patterns: &[String]| -> Vec<String> {
            patterns.iter().map(|p| p.to_lowercase()).collect()
        };
        let jobs = rules
            .iter()
            .map(|rule| CompiledJob {
                rule,
                vendor_patterns: fold(&rule.vendor_patterns),
                description_patterns: fold(&rule.description_patterns),
            })
            .collect();
        Self { jobs }
    }

    /// Walks the rules in stored order and stops at the first one that claims
    /// the transaction.
    ///
    /// Fails only when the transaction's date is missing or unparseable.
    pub fn classify(&self, tx: &Transaction) -> Result<Classification<'a>, TransactionError> {
        // Checked up front so a defective date fails even against an empty rule set.
        tx.date.as_date()?;

        for job in &self.jobs {
            if job.matches(tx)? {
                return Ok(Classification::Job(job.rule));
            }
        }
        Ok(Classification::Unmatched)
    }
}

/// One-off classification. Prefer [`JobMatcher`] when classifying many
/// transactions against the same rules.
pub fn classify<'a>(
    tx: &Transaction,
    rules: &'a JobRuleSet,
) -> Result<Classification<'a>, TransactionError> {
    JobMatcher::new(rules).classify(tx)
}

/// A transaction that could not be classified and was filed under
/// [`UNCATEGORIZED`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defect {
    /// Zero-based position in the input sequence.
    pub index: usize,
    pub error: TransactionError,
}

/// Transactions partitioned into named buckets.
///
/// Buckets iterate in lexicographic (case-sensitive) name order; within a
/// bucket transactions keep their input order. Only non-empty buckets exist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categorization {
    buckets: BTreeMap<String, Vec<Transaction>>,
    defects: Vec<Defect>,
}

impl Categorization {
    pub fn buckets(&self) -> impl Iterator<Item = (&str, &[Transaction])> {
        self.buckets
            .iter()
            .map(|(name, txs)| (name.as_str(), txs.as_slice()))
    }

    pub fn bucket(&self, name: &str) -> Option<&[Transaction]> {
        self.buckets.get(name).map(Vec::as_slice)
    }

    pub fn bucket_names(&self) -> impl Iterator<Item = &str> {
        self.buckets.keys().map(String::as_str)
    }

    /// Total number of transactions across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn defects(&self) -> &[Defect] {
        &self.defects
    }

    fn push(&mut self, bucket: &str, tx: Transaction) {
        match self.buckets.get_mut(bucket) {
            Some(txs) => txs.push(tx),
            None => {
                self.buckets.insert(bucket.to_string(), vec![tx]);
            }
        }
    }
}

/// Classify every transaction and file it into its bucket.
///
/// Transactions that fail classification are filed under [`UNCATEGORIZED`]
/// and recorded in [`Categorization::defects`].
pub fn categorize(
    transactions: impl IntoIterator<Item = Transaction>,
    rules: &JobRuleSet,
) -> Categorization {
    let matcher = JobMatcher::new(rules);
    let mut result = Categorization::default();

    for (index, tx) in transactions.into_iter().enumerate() {
        match matcher.classify(&tx) {
            Ok(classification) => {
                let bucket = classification.bucket_name();
                result.push(bucket, tx);
            }
            Err(error) => {
                tracing::warn!(
                    index,
                    date = %tx.date,
                    vendor = %tx.vendor,
                    description = %tx.description,
                    amount = %tx.amount,
                    %error,
                    "Unclassifiable transaction filed as {UNCATEGORIZED}"
                );
                result.defects.push(Defect { index, error });
                result.push(UNCATEGORIZED, tx);
            }
        }
    }

    tracing::debug!(
        transactions = result.len(),
        buckets = result.buckets.len(),
        defects = result.defects.len(),
        "Categorization complete"
    );
    result
}
