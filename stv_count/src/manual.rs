/*!

This is the long-form manual for `stv_count` and `hsenate`.

## The count

Each ballot carries an ordered list of candidates and a weight. Ordinary ballots weigh 1. A
group voting ticket is represented by a single ballot, weighted by the above the line votes of
its group divided by the number of tickets the group lodged.

The quota is computed once, before the first step:

```text
quota = floor(ceil(total weight) / (vacancies + 1)) + 1
```

The first step (`Count 0`) only distributes the first preferences. Each following step does one
of the following:
- if the leading candidate has strictly more votes than the quota, they are elected. Their
  ballots move to the next continuing candidate at the transfer value
  `(votes - quota) / votes`.
- otherwise, if a single continuing candidate remains, they are elected without any transfer.
  This is only allowed for the last vacancy.
- otherwise the candidate with the fewest votes is excluded and their ballots move on at full
  value.

A ballot that moves skips the candidates that are already elected or excluded. A ballot with
no continuing candidate left is exhausted and its weight leaves the count. The transfer value
is applied once per move, however many candidates are skipped.

Ties, for the most or for the fewest votes, go to the candidate that sorts first by family
name, given names, party and identifier.

## Formality

The raw preferences of a ballot map candidates to numbers. A ballot that gives the same number
to two candidates is informal and is dropped. Gaps in the numbering are skipped: a ballot
marked 1 and 3 gives two preferences.

## Count modes

* `standard`: the tickets and the below the line ballots.
* `belowTheLineOnly`: the tickets are removed. The above the line votes of all the tickets
  starting with a candidate are shared equally among the below the line ballots starting with
  the same candidate.

When tickets are lodged, only the candidates appearing on a ticket take part in the count.

## Input files

`hsenate` reads a JSON election description:

```text
{
  "contestName": "Tasmanian Senate",
  "contestDate": "2013-09-07",
  "state": "TAS",
  "vacancies": 6,
  "countMode": "standard",
  "dataSources": {
    "candidatesFile": "SenateCandidatesDownload.txt",
    "groupVotingTicketsFile": "SenateGroupVotingTicketsDownload.txt",
    "firstPreferencesByGroupFile": "SenateUseOfGvtByGroupDownload.txt",
    "btlPreferencesFile": "SenateStateBTLPreferences-TAS.csv"
  }
}
```

`vacancies` and `countMode` are optional. By default, 6 seats are filled for a state and 2 for
a territory. The file paths are relative to the description.

The data files follow the downloads of the Australian Electoral Commission: the first line is
an information line and the second line holds the column names. All the files are tab
separated, except the below the line preferences which are comma separated. Only the columns
below are read (counting from 0):

| file                      | columns                                                        |
|---------------------------|----------------------------------------------------------------|
| candidates                | 0 state, 1 party, 3 candidate id, 4 surname, 5 given names     |
| group voting tickets      | 0 state, 3 group, 4 ticket, 5 candidate id, 12 preference     |
| first preferences by group| 0 state, 1 group, 4 votes                                      |
| below the line            | 0 candidate id, 1 preference, 2 batch, 3 paper                 |

The lines of other states are ignored. In the below the line file, the lines sharing a batch
and a paper make one ballot, and blank preferences are ignored.

## Output

The count is printed step by step, with the candidate elected or excluded and the votes of
every continuing candidate. `--out` writes a JSON summary (or prints it with `--out stdout`).
`--reference` compares the summary with a previous one, prints the differences and fails if
they do not match.

 */
