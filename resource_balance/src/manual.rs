/*!

This is the long-form manual for `resource_balance` and `skolrec`.

## The survey sheet

The input is one table exported from the national school resource survey,
as delimited text or as the first worksheet of an Excel workbook. The first
three rows classify the columns and every following row is one school:

| row | content |
|-----|---------|
| 0 | column codes (`4.1.`, `5.2.`, `6.1.`, `11.1.`, ...) |
| 1 | class-level labels (`1.kl.`, `10.kl.`, `Pamatkurss`, ...) |
| 2 | subject labels (`Matemātika`, ...) |
| 3+ | school name in column 0, counts in the remaining columns |

Column codes group the counts:

* `4.` student counts, shared by every resource type,
* `5.` textbook counts,
* `6.` workbook counts,
* `11.` resources counted for every resource type.

Columns whose class level is `Piezīmes` carry free-text notes, and a small
set of subjects describes purchases outside the scope of the report; both
kinds are dropped before any processing.

## The computed table

For the chosen subject and resource type, every school and class level gets
`resource count − student count`. The class levels `Pamatkurss`, `10.kl.`
and `11.kl.` are reported as the single category `Pamatkurss (10./11.)`,
and `Padziļinātais kurss` is never reported. A cell whose student or
resource side is missing or not numeric is reported as `Unknown` rather
than failing the run, and class levels with no resource data at all are
dropped. The table is finished with a totals row and column (unknown cells
counting as zero) and per-cell styling directives.

## The report configuration

`skolrec --config report.json` reads a JSON description:

```json
{
  "outputSettings": {
    "reportName": "dobele-2024",
    "outputDirectory": "reports",
    "municipality": "Dobeles novads",
    "schoolYear": "2024/2025"
  },
  "sheetSource": {
    "provider": "csv",
    "filePath": "survey.csv"
  },
  "selection": {
    "subject": "Matemātika",
    "resourceType": "textbooks"
  }
}
```

`provider` is `csv` or `excel`; `excelWorksheetName` picks a worksheet when
the workbook has more than one. A relative `filePath` is resolved against
the directory of the configuration file. Everything in `selection` can be
overridden from the command line, and `--input` runs without any
configuration file at all:

```bash
skolrec --input survey.csv --subject "Matemātika" --resource-type workbooks
skolrec --input survey.xlsx --input-type excel --list-subjects
```

*/
